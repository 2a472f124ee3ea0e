#[allow(unused)]
mod support;

use constellation::models::{ElementSetType, MetadataMode};
use constellation::reader::{MemoryVariableSource, MetadataReader};
use constellation::Error;
use support::*;

#[tokio::test]
async fn iso_record_carries_contacts_and_profile() -> anyhow::Result<()> {
    let reader = memory_reader(sample_source());

    let record = match reader
        .get_metadata(MED, MetadataMode::Iso19115, ElementSetType::Full, &[])
        .await?
    {
        Some(record) => record,
        None => panic!("expected record {MED}"),
    };
    assert_eq!(record.root_class, "MD_Metadata");
    assert_eq!(record.content["hierarchyLevel"]["codeListValue"], "dataset");
    let party = &record.content["identificationInfo"]["pointOfContact"][0];
    assert_eq!(party["organisationName"], "IFREMER");
    assert_eq!(party["role"]["codeListValue"], "originator");

    // Native records are served as ISO.
    let native = reader
        .get_metadata(MED, MetadataMode::Native, ElementSetType::Brief, &[])
        .await?;
    assert_eq!(native, Some(record));
    Ok(())
}

#[tokio::test]
async fn dublin_core_selection() -> anyhow::Result<()> {
    let reader = memory_reader(sample_source());

    let brief = reader
        .get_metadata(BALTIC, MetadataMode::DublinCore, ElementSetType::Brief, &[])
        .await?
        .map(|r| r.content);
    let Some(brief) = brief else {
        panic!("expected record {BALTIC}");
    };
    let keys: Vec<&str> = brief
        .as_object()
        .map(|o| o.keys().map(String::as_str).collect())
        .unwrap_or_default();
    assert_eq!(keys, ["identifier", "title", "type", "BoundingBox"]);

    let named = reader
        .get_metadata(
            BALTIC,
            MetadataMode::DublinCore,
            ElementSetType::Brief,
            &["subject".to_string(), "date".to_string()],
        )
        .await?;
    let Some(named) = named else {
        panic!("expected record {BALTIC}");
    };
    assert_eq!(named.content["subject"], serde_json::json!(["oxygen", "temperature"]));
    assert_eq!(named.content["date"], "1985-01-01");
    assert!(named.content.get("title").is_none());
    Ok(())
}

#[tokio::test]
async fn unknown_identifiers_and_listing() -> anyhow::Result<()> {
    let reader = memory_reader(sample_source());

    assert_eq!(
        reader
            .get_metadata("missing", MetadataMode::Iso19115, ElementSetType::Full, &[])
            .await?,
        None
    );
    assert_eq!(
        reader.get_all_identifiers().await?,
        [BALTIC, MED, GLOBAL, NORTH_SEA]
    );
    assert_eq!(reader.get_all_entries().await?.len(), 4);

    let empty = memory_reader(MemoryVariableSource::new());
    assert!(empty.get_all_entries().await?.is_empty());
    Ok(())
}

#[test]
fn metadata_modes_parse_names_and_codes() {
    assert_eq!("ISO_19115".parse::<MetadataMode>().ok(), Some(MetadataMode::Iso19115));
    assert_eq!("dublincore".parse::<MetadataMode>().ok(), Some(MetadataMode::DublinCore));
    assert_eq!("3".parse::<MetadataMode>().ok(), Some(MetadataMode::Native));
    assert_eq!(MetadataMode::from_code(1).ok(), Some(MetadataMode::DublinCore));

    for bad in ["EBRIM", "7", ""] {
        match bad.parse::<MetadataMode>() {
            Err(Error::InvalidArgument(_)) => {}
            other => panic!("expected invalid argument for {bad:?}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn search_records_skips_vanished_records() -> anyhow::Result<()> {
    let catalog = TestCatalog::new().await?;
    let outcome = catalog
        .service
        .search_records(
            &constellation::search::SpatialQuery::text("temperature"),
            MetadataMode::DublinCore,
            ElementSetType::Summary,
            &[],
        )
        .await?;
    assert_eq!(outcome.matched, 2);
    assert_eq!(outcome.records.len(), 2);
    assert!(outcome.missing.is_empty());

    // Index a record the store does not have.
    let orphan = constellation::models::MetadataRecord::iso(
        "orphan",
        serde_json::json!({"identificationInfo": {"citation": {"title": "temperature orphan"}}}),
    );
    catalog.service.indexer().index_document(&orphan)?;
    catalog.searcher().refresh()?;

    let outcome = catalog
        .service
        .search_records(
            &constellation::search::SpatialQuery::text("temperature"),
            MetadataMode::Iso19115,
            ElementSetType::Full,
            &[],
        )
        .await?;
    assert_eq!(outcome.matched, 3);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.missing, ["orphan"]);
    Ok(())
}
