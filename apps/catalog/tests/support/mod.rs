pub mod fixtures;
pub mod shared;

use constellation::config::SearchConfig;
use constellation::index::{IndexDirectory, MemoryDirectory};
use constellation::indexer::GenericIndexer;
use constellation::reader::{
    ContactDirectory, GenericMetadataReader, MemoryVariableSource, SdnDialect, SdnProfile,
};
use constellation::search::IndexSearcher;
use constellation::services::CatalogService;
use std::sync::Arc;

pub use fixtures::*;

pub type MemoryReader = GenericMetadataReader<SdnDialect, MemoryVariableSource>;

/// A catalog over an in-memory index, rebuilt from the sample records.
pub struct TestCatalog {
    pub directory: Arc<MemoryDirectory>,
    pub service: CatalogService,
}

impl TestCatalog {
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_source(sample_source()).await
    }

    pub async fn with_source(source: MemoryVariableSource) -> anyhow::Result<Self> {
        shared::init_tracing();

        let directory = Arc::new(MemoryDirectory::new());
        let dyn_directory: Arc<dyn IndexDirectory> = directory.clone();
        let searcher = Arc::new(IndexSearcher::open(
            dyn_directory.clone(),
            &SearchConfig::default(),
        )?);
        let indexer = GenericIndexer::new(dyn_directory);
        let service = CatalogService::new(searcher, indexer, Arc::new(memory_reader(source)));
        service.rebuild_index().await?;

        Ok(Self { directory, service })
    }

    pub fn searcher(&self) -> &IndexSearcher {
        self.service.searcher()
    }
}

pub fn memory_reader(source: MemoryVariableSource) -> MemoryReader {
    GenericMetadataReader::new(SdnDialect::new(SdnProfile::Cdi, contacts()), source)
}

pub fn contacts() -> ContactDirectory {
    let mut contacts = ContactDirectory::new();
    contacts.insert(
        "486",
        serde_json::json!({ "organisationName": "IFREMER", "electronicMailAddress": "sismer@ifremer.fr" }),
    );
    contacts
}

/// Sorted copy, for assertions that do not depend on result order.
pub fn sorted(mut ids: Vec<String>) -> Vec<String> {
    ids.sort();
    ids
}
