//! Built-in queryables
//!
//! Each queryable names an index field and the ordered path expressions that
//! feed it. Paths are listed for ISO 19115 and Dublin Core; a path written
//! for another standard simply resolves nothing.

use std::collections::BTreeMap;

pub const WEST_FIELD: &str = "WestBoundLongitude";
pub const EAST_FIELD: &str = "EastBoundLongitude";
pub const SOUTH_FIELD: &str = "SouthBoundLatitude";
pub const NORTH_FIELD: &str = "NorthBoundLatitude";

/// Fields compared as numbers in ranges and sorts.
pub const NUMERIC_QUERYABLES: &[&str] = &[WEST_FIELD, EAST_FIELD, SOUTH_FIELD, NORTH_FIELD];

const QUERYABLES: &[(&str, &[&str])] = &[
    (
        "Identifier",
        &["ISO 19115:MD_Metadata:fileIdentifier", "Catalog Web Service:Record:identifier"],
    ),
    (
        "Title",
        &[
            "ISO 19115:MD_Metadata:identificationInfo:citation:title",
            "Catalog Web Service:Record:title",
        ],
    ),
    (
        "AlternateTitle",
        &["ISO 19115:MD_Metadata:identificationInfo:citation:alternateTitle"],
    ),
    (
        "Abstract",
        &[
            "ISO 19115:MD_Metadata:identificationInfo:abstract",
            "Catalog Web Service:Record:abstract",
            "Catalog Web Service:Record:description",
        ],
    ),
    (
        "Subject",
        &[
            "ISO 19115:MD_Metadata:identificationInfo:descriptiveKeywords:keyword",
            "ISO 19115:MD_Metadata:identificationInfo:topicCategory",
            "Catalog Web Service:Record:subject",
        ],
    ),
    (
        "TopicCategory",
        &["ISO 19115:MD_Metadata:identificationInfo:topicCategory"],
    ),
    (
        "Type",
        &["ISO 19115:MD_Metadata:hierarchyLevel", "Catalog Web Service:Record:type"],
    ),
    (
        "Format",
        &[
            "ISO 19115:MD_Metadata:distributionInfo:distributionFormat:name",
            "Catalog Web Service:Record:format",
        ],
    ),
    (
        "Language",
        &["ISO 19115:MD_Metadata:language", "Catalog Web Service:Record:language"],
    ),
    (
        "ResourceLanguage",
        &["ISO 19115:MD_Metadata:identificationInfo:language"],
    ),
    (
        "Modified",
        &["ISO 19115:MD_Metadata:dateStamp", "Catalog Web Service:Record:modified"],
    ),
    (
        "CreationDate",
        &["ISO 19115:MD_Metadata:identificationInfo:citation:date#dateType=creation:date"],
    ),
    (
        "RevisionDate",
        &["ISO 19115:MD_Metadata:identificationInfo:citation:date#dateType=revision:date"],
    ),
    (
        "PublicationDate",
        &["ISO 19115:MD_Metadata:identificationInfo:citation:date#dateType=publication:date"],
    ),
    (
        "OrganisationName",
        &[
            "ISO 19115:MD_Metadata:identificationInfo:pointOfContact:organisationName",
            "ISO 19115:MD_Metadata:contact:organisationName",
            "Catalog Web Service:Record:creator",
            "Catalog Web Service:Record:publisher",
        ],
    ),
    (
        "TempExtent_begin",
        &["ISO 19115:MD_Metadata:identificationInfo:extent:temporalElement:extent:beginPosition"],
    ),
    (
        "TempExtent_end",
        &["ISO 19115:MD_Metadata:identificationInfo:extent:temporalElement:extent:endPosition"],
    ),
    (
        "CRS",
        &["ISO 19115:MD_Metadata:referenceSystemInfo:referenceSystemIdentifier:code"],
    ),
    (
        WEST_FIELD,
        &[
            "ISO 19115:MD_Metadata:identificationInfo:extent:geographicElement:westBoundLongitude",
            "Catalog Web Service:Record:BoundingBox:minx",
        ],
    ),
    (
        EAST_FIELD,
        &[
            "ISO 19115:MD_Metadata:identificationInfo:extent:geographicElement:eastBoundLongitude",
            "Catalog Web Service:Record:BoundingBox:maxx",
        ],
    ),
    (
        SOUTH_FIELD,
        &[
            "ISO 19115:MD_Metadata:identificationInfo:extent:geographicElement:southBoundLatitude",
            "Catalog Web Service:Record:BoundingBox:miny",
        ],
    ),
    (
        NORTH_FIELD,
        &[
            "ISO 19115:MD_Metadata:identificationInfo:extent:geographicElement:northBoundLatitude",
            "Catalog Web Service:Record:BoundingBox:maxy",
        ],
    ),
];

/// The built-in queryable table, keyed by field name.
pub fn default_queryables() -> BTreeMap<String, Vec<String>> {
    QUERYABLES
        .iter()
        .map(|(name, paths)| {
            (
                name.to_string(),
                paths.iter().map(|p| p.to_string()).collect(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use constellation_path::MetadataPath;

    #[test]
    fn every_builtin_path_parses() {
        for (name, paths) in default_queryables() {
            assert!(!paths.is_empty(), "{name} has no paths");
            for path in paths {
                assert!(MetadataPath::parse(&path).is_ok(), "{name}: {path}");
            }
        }
    }

    #[test]
    fn bounding_box_fields_are_numeric() {
        let table = default_queryables();
        for field in NUMERIC_QUERYABLES {
            assert!(table.contains_key(*field));
        }
    }
}
