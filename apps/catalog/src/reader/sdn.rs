//! SeaDataNet dialect
//!
//! Builds ISO 19115 and Dublin Core records from the variables of the
//! SeaDataNet catalogues (CDI, CSR, EDMED). The profiles share one variable
//! set and differ in hierarchy level and default responsible-party role.
//! Responsible parties are referenced by contact identifier and resolved
//! against a [`ContactDirectory`].

use crate::config::SdnProfileConfig;
use crate::models::{ElementSetType, MetadataRecord};
use crate::reader::dialect::{put_values, select_dublin_core_elements};
use crate::reader::{ContactDirectory, ReaderDialect, Values};
use crate::Result;
use serde_json::{json, Map, Value};

pub const TITLE: &str = "title";
pub const ALTERNATE_TITLE: &str = "alternate_title";
pub const ABSTRACT: &str = "abstract";
pub const KEYWORD: &str = "keyword";
pub const TOPIC_CATEGORY: &str = "topic_category";
pub const CREATION_DATE: &str = "creation_date";
pub const REVISION_DATE: &str = "revision_date";
pub const PUBLICATION_DATE: &str = "publication_date";
pub const DATE_STAMP: &str = "date_stamp";
pub const LANGUAGE: &str = "language";
pub const RESOURCE_LANGUAGE: &str = "resource_language";
pub const FORMAT: &str = "format";
pub const CRS: &str = "crs";
pub const WEST_BOUND: &str = "west_bound";
pub const EAST_BOUND: &str = "east_bound";
pub const SOUTH_BOUND: &str = "south_bound";
pub const NORTH_BOUND: &str = "north_bound";
pub const TEMPORAL_BEGIN: &str = "temporal_begin";
pub const TEMPORAL_END: &str = "temporal_end";
/// Contact identifiers of the metadata point of contact.
pub const METADATA_CONTACT: &str = "metadata_contact";
/// Contact identifiers of the resource responsible parties.
pub const RESPONSIBLE_PARTY: &str = "responsible_party";
pub const RELATION: &str = "relation";
pub const SPATIAL: &str = "spatial";
pub const CONTRIBUTOR: &str = "contributor";
pub const RIGHTS: &str = "rights";
pub const SOURCE: &str = "source";

const ISO_VARIABLES: &[&str] = &[
    TITLE,
    ALTERNATE_TITLE,
    ABSTRACT,
    KEYWORD,
    TOPIC_CATEGORY,
    CREATION_DATE,
    REVISION_DATE,
    PUBLICATION_DATE,
    DATE_STAMP,
    LANGUAGE,
    RESOURCE_LANGUAGE,
    FORMAT,
    CRS,
    WEST_BOUND,
    EAST_BOUND,
    SOUTH_BOUND,
    NORTH_BOUND,
    TEMPORAL_BEGIN,
    TEMPORAL_END,
    METADATA_CONTACT,
    RESPONSIBLE_PARTY,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdnProfile {
    /// Common Data Index: datasets.
    Cdi,
    /// Cruise Summary Reports: field sessions.
    Csr,
    /// European Directory of Marine Environmental Data.
    Edmed,
}

impl SdnProfile {
    pub fn hierarchy_level(&self) -> &'static str {
        match self {
            SdnProfile::Cdi | SdnProfile::Edmed => "dataset",
            SdnProfile::Csr => "fieldSession",
        }
    }

    pub fn default_role(&self) -> &'static str {
        match self {
            SdnProfile::Cdi => "originator",
            SdnProfile::Csr => "principalInvestigator",
            SdnProfile::Edmed => "custodian",
        }
    }
}

impl From<SdnProfileConfig> for SdnProfile {
    fn from(config: SdnProfileConfig) -> Self {
        match config {
            SdnProfileConfig::Cdi => SdnProfile::Cdi,
            SdnProfileConfig::Csr => SdnProfile::Csr,
            SdnProfileConfig::Edmed => SdnProfile::Edmed,
        }
    }
}

pub struct SdnDialect {
    profile: SdnProfile,
    contacts: ContactDirectory,
}

impl SdnDialect {
    pub fn new(profile: SdnProfile, contacts: ContactDirectory) -> Self {
        Self { profile, contacts }
    }

    pub fn profile(&self) -> SdnProfile {
        self.profile
    }

    /// Responsible-party objects for contact ids, tagged with `role`. Unknown
    /// ids are logged and dropped.
    fn parties(&self, identifier: &str, ids: &[String], role: &str) -> Vec<Value> {
        ids.iter()
            .filter_map(|id| match self.contacts.get(id) {
                Some(contact) => {
                    let mut party = contact.clone();
                    if let Some(object) = party.as_object_mut() {
                        object.insert("role".to_string(), json!({ "codeListValue": role }));
                    }
                    Some(party)
                }
                None => {
                    tracing::warn!(record = identifier, contact = %id, "Unknown contact reference");
                    None
                }
            })
            .collect()
    }

    /// Organisation names for contact ids, falling back to the id itself.
    fn organisation_names(&self, ids: &[String]) -> Vec<String> {
        ids.iter()
            .map(|id| {
                self.contacts
                    .get(id)
                    .and_then(|c| c.get("organisationName"))
                    .and_then(Value::as_str)
                    .unwrap_or(id)
                    .to_string()
            })
            .collect()
    }

    fn dc_variables(element: &str) -> &'static [&'static str] {
        match element {
            "title" => &[TITLE],
            "BoundingBox" => &[WEST_BOUND, EAST_BOUND, SOUTH_BOUND, NORTH_BOUND],
            "subject" => &[KEYWORD, TOPIC_CATEGORY],
            "format" => &[FORMAT],
            "relation" => &[RELATION],
            "modified" => &[DATE_STAMP],
            "abstract" | "description" => &[ABSTRACT],
            "spatial" => &[SPATIAL],
            "creator" => &[RESPONSIBLE_PARTY],
            "publisher" => &[METADATA_CONTACT],
            "contributor" => &[CONTRIBUTOR],
            "date" => &[CREATION_DATE],
            "language" => &[LANGUAGE],
            "rights" => &[RIGHTS],
            "source" => &[SOURCE],
            "coverage" => &[TEMPORAL_BEGIN, TEMPORAL_END],
            _ => &[],
        }
    }
}

/// West, east, south and north values grouped per box; the n-th value of each
/// variable belongs to the n-th box.
fn bounding_boxes(values: &Values) -> Vec<[&str; 4]> {
    let [west, east, south, north] =
        [WEST_BOUND, EAST_BOUND, SOUTH_BOUND, NORTH_BOUND].map(|k| values.get_all(k));
    west.iter()
        .zip(east)
        .zip(south)
        .zip(north)
        .map(|(((w, e), s), n)| [w.as_str(), e.as_str(), s.as_str(), n.as_str()])
        .collect()
}

impl ReaderDialect for SdnDialect {
    fn variables_for_iso(&self) -> Vec<String> {
        ISO_VARIABLES.iter().map(|v| v.to_string()).collect()
    }

    fn variables_for_dublin_core(
        &self,
        element_set: ElementSetType,
        element_names: &[String],
    ) -> Vec<String> {
        // Title is always loaded: a record without one does not exist.
        let mut variables = vec![TITLE.to_string()];
        for element in select_dublin_core_elements(element_set, element_names) {
            for variable in Self::dc_variables(element) {
                if !variables.iter().any(|v| v.as_str() == *variable) {
                    variables.push(variable.to_string());
                }
            }
        }
        variables
    }

    fn get_iso(&self, identifier: &str, values: &Values) -> Result<MetadataRecord> {
        let mut citation = Map::new();
        put_values(&mut citation, "title", values.get_all(TITLE));
        put_values(&mut citation, "alternateTitle", values.get_all(ALTERNATE_TITLE));
        let dates: Vec<Value> = [
            (CREATION_DATE, "creation"),
            (REVISION_DATE, "revision"),
            (PUBLICATION_DATE, "publication"),
        ]
        .into_iter()
        .flat_map(|(variable, date_type)| {
            values.get_all(variable).iter().map(move |date| {
                json!({ "date": date, "dateType": { "codeListValue": date_type } })
            })
        })
        .collect();
        if !dates.is_empty() {
            citation.insert("date".to_string(), Value::Array(dates));
        }

        let mut extent = Map::new();
        let geographic: Vec<Value> = bounding_boxes(values)
            .into_iter()
            .map(|[w, e, s, n]| {
                json!({
                    "westBoundLongitude": w,
                    "eastBoundLongitude": e,
                    "southBoundLatitude": s,
                    "northBoundLatitude": n,
                })
            })
            .collect();
        if !geographic.is_empty() {
            extent.insert("geographicElement".to_string(), Value::Array(geographic));
        }
        let mut period = Map::new();
        put_values(&mut period, "beginPosition", values.get_all(TEMPORAL_BEGIN));
        put_values(&mut period, "endPosition", values.get_all(TEMPORAL_END));
        if !period.is_empty() {
            extent.insert(
                "temporalElement".to_string(),
                json!({ "extent": Value::Object(period) }),
            );
        }

        let mut identification = Map::new();
        identification.insert("citation".to_string(), Value::Object(citation));
        put_values(&mut identification, "abstract", values.get_all(ABSTRACT));
        let keywords = values.get_all(KEYWORD);
        if !keywords.is_empty() {
            identification.insert(
                "descriptiveKeywords".to_string(),
                json!([{ "keyword": keywords }]),
            );
        }
        put_values(&mut identification, "topicCategory", values.get_all(TOPIC_CATEGORY));
        put_values(&mut identification, "language", values.get_all(RESOURCE_LANGUAGE));
        if !extent.is_empty() {
            identification.insert("extent".to_string(), Value::Object(extent));
        }
        let parties = self.parties(
            identifier,
            values.get_all(RESPONSIBLE_PARTY),
            self.profile.default_role(),
        );
        if !parties.is_empty() {
            identification.insert("pointOfContact".to_string(), Value::Array(parties));
        }

        let mut root = Map::new();
        root.insert("fileIdentifier".to_string(), Value::String(identifier.to_string()));
        put_values(&mut root, "language", values.get_all(LANGUAGE));
        root.insert(
            "hierarchyLevel".to_string(),
            json!({ "codeListValue": self.profile.hierarchy_level() }),
        );
        let contacts = self.parties(
            identifier,
            values.get_all(METADATA_CONTACT),
            "pointOfContact",
        );
        if !contacts.is_empty() {
            root.insert("contact".to_string(), Value::Array(contacts));
        }
        put_values(&mut root, "dateStamp", values.get_all(DATE_STAMP));
        if let Some(code) = values.get(CRS) {
            root.insert(
                "referenceSystemInfo".to_string(),
                json!({ "referenceSystemIdentifier": { "code": code } }),
            );
        }
        root.insert("identificationInfo".to_string(), Value::Object(identification));
        let formats = values.get_all(FORMAT);
        if !formats.is_empty() {
            let formats: Vec<Value> = formats.iter().map(|f| json!({ "name": f })).collect();
            root.insert(
                "distributionInfo".to_string(),
                json!({ "distributionFormat": formats }),
            );
        }

        Ok(MetadataRecord::iso(identifier, Value::Object(root)))
    }

    fn get_dublin_core(
        &self,
        identifier: &str,
        values: &Values,
        element_set: ElementSetType,
        element_names: &[String],
    ) -> Result<MetadataRecord> {
        let mut record = Map::new();
        for element in select_dublin_core_elements(element_set, element_names) {
            match element {
                "identifier" => {
                    record.insert(element.to_string(), Value::String(identifier.to_string()));
                }
                "type" => {
                    record.insert(
                        element.to_string(),
                        Value::String(self.profile.hierarchy_level().to_string()),
                    );
                }
                "BoundingBox" => {
                    let boxes: Vec<Value> = bounding_boxes(values)
                        .into_iter()
                        .map(|[w, e, s, n]| json!({ "minx": w, "maxx": e, "miny": s, "maxy": n }))
                        .collect();
                    if !boxes.is_empty() {
                        record.insert(element.to_string(), Value::Array(boxes));
                    }
                }
                "creator" => {
                    let names = self.organisation_names(values.get_all(RESPONSIBLE_PARTY));
                    put_values(&mut record, element, &names);
                }
                "publisher" => {
                    let names = self.organisation_names(values.get_all(METADATA_CONTACT));
                    put_values(&mut record, element, &names);
                }
                "coverage" => {
                    if let (Some(begin), Some(end)) =
                        (values.get(TEMPORAL_BEGIN), values.get(TEMPORAL_END))
                    {
                        record.insert(element.to_string(), Value::String(format!("{begin}/{end}")));
                    }
                }
                _ => {
                    let all: Vec<String> = Self::dc_variables(element)
                        .iter()
                        .flat_map(|v| values.get_all(v).iter().cloned())
                        .collect();
                    put_values(&mut record, element, &all);
                }
            }
        }

        Ok(MetadataRecord::dublin_core(identifier, Value::Object(record)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> Values {
        [
            (TITLE, "Temperature profiles"),
            (KEYWORD, "temperature"),
            (KEYWORD, "salinity"),
            (CREATION_DATE, "1990-06-09"),
            (WEST_BOUND, "1.5"),
            (EAST_BOUND, "2.5"),
            (SOUTH_BOUND, "40.0"),
            (NORTH_BOUND, "41.0"),
            (TEMPORAL_BEGIN, "1990-06-09"),
            (TEMPORAL_END, "1990-06-10"),
            (RESPONSIBLE_PARTY, "486"),
            (RESPONSIBLE_PARTY, "999"),
        ]
        .into_iter()
        .collect()
    }

    fn dialect(profile: SdnProfile) -> SdnDialect {
        let mut contacts = ContactDirectory::new();
        contacts.insert("486", json!({ "organisationName": "IFREMER" }));
        SdnDialect::new(profile, contacts)
    }

    #[test]
    fn iso_record_follows_profile() {
        let record = dialect(SdnProfile::Csr).get_iso("csr-1", &values()).unwrap();
        let content = &record.content;

        assert_eq!(content["fileIdentifier"], "csr-1");
        assert_eq!(content["hierarchyLevel"]["codeListValue"], "fieldSession");
        let info = &content["identificationInfo"];
        assert_eq!(info["citation"]["title"], "Temperature profiles");
        assert_eq!(info["citation"]["date"][0]["dateType"]["codeListValue"], "creation");
        assert_eq!(info["descriptiveKeywords"][0]["keyword"], json!(["temperature", "salinity"]));
        assert_eq!(info["extent"]["geographicElement"][0]["westBoundLongitude"], "1.5");
        assert_eq!(info["extent"]["temporalElement"]["extent"]["endPosition"], "1990-06-10");

        // The unknown contact 999 is dropped.
        let parties = info["pointOfContact"].as_array().unwrap();
        assert_eq!(parties.len(), 1);
        assert_eq!(parties[0]["role"]["codeListValue"], "principalInvestigator");
    }

    #[test]
    fn dublin_core_brief_has_four_elements() {
        let dialect = dialect(SdnProfile::Cdi);
        let record = dialect
            .get_dublin_core("cdi-1", &values(), ElementSetType::Brief, &[])
            .unwrap();
        let object = record.content.as_object().unwrap();

        assert_eq!(object.len(), 4);
        assert_eq!(object["identifier"], "cdi-1");
        assert_eq!(object["type"], "dataset");
        assert_eq!(object["BoundingBox"][0]["maxy"], "41.0");
    }

    #[test]
    fn dublin_core_full_maps_contacts_and_coverage() {
        let record = dialect(SdnProfile::Edmed)
            .get_dublin_core("e-1", &values(), ElementSetType::Full, &[])
            .unwrap();
        assert_eq!(record.content["creator"], json!(["IFREMER", "999"]));
        assert_eq!(record.content["coverage"], "1990-06-09/1990-06-10");
        assert_eq!(record.content["subject"], json!(["temperature", "salinity"]));
        assert!(record.content.get("rights").is_none());
    }

    #[test]
    fn dublin_core_variables_follow_selection() {
        let dialect = dialect(SdnProfile::Cdi);
        let variables =
            dialect.variables_for_dublin_core(ElementSetType::Full, &["subject".to_string()]);
        assert_eq!(variables, [TITLE, KEYWORD, TOPIC_CATEGORY]);
        assert_eq!(dialect.variables_for_iso().len(), ISO_VARIABLES.len());
    }
}
