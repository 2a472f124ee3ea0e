//! Catalog service - search plus record retrieval
//!
//! Composes the index searcher, the indexer and a metadata reader:
//! - Runs spatial queries and fetches the matching records
//! - Rebuilds or updates the index from the reader
//!
//! The index and the metadata store are not updated atomically; hits whose
//! record has disappeared from the store are skipped.

use crate::indexer::GenericIndexer;
use crate::models::{ElementSetType, MetadataMode, MetadataRecord};
use crate::reader::MetadataReader;
use crate::search::{IndexSearcher, SpatialQuery};
use crate::Result;
use serde::Serialize;
use std::sync::Arc;

/// Records returned by [`CatalogService::search_records`].
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    /// Number of identifiers matched by the index
    pub matched: usize,
    pub records: Vec<MetadataRecord>,
    /// Hits whose record could not be found in the store
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

pub struct CatalogService {
    searcher: Arc<IndexSearcher>,
    indexer: GenericIndexer,
    reader: Arc<dyn MetadataReader>,
}

impl CatalogService {
    pub fn new(
        searcher: Arc<IndexSearcher>,
        indexer: GenericIndexer,
        reader: Arc<dyn MetadataReader>,
    ) -> Self {
        Self {
            searcher,
            indexer,
            reader,
        }
    }

    pub fn searcher(&self) -> &Arc<IndexSearcher> {
        &self.searcher
    }

    pub fn indexer(&self) -> &GenericIndexer {
        &self.indexer
    }

    /// Identifiers matching `query`.
    pub fn search(&self, query: &SpatialQuery) -> Result<Vec<String>> {
        self.searcher.do_search(query)
    }

    /// Run `query` and fetch every hit in the requested representation.
    pub async fn search_records(
        &self,
        query: &SpatialQuery,
        mode: MetadataMode,
        element_set: ElementSetType,
        element_names: &[String],
    ) -> Result<SearchOutcome> {
        let identifiers = self.searcher.do_search(query)?;

        let mut records = Vec::with_capacity(identifiers.len());
        let mut missing = Vec::new();
        for identifier in &identifiers {
            match self
                .reader
                .get_metadata(identifier, mode, element_set, element_names)
                .await?
            {
                Some(record) => records.push(record),
                None => {
                    tracing::warn!(
                        identifier = %identifier,
                        "Indexed record no longer in the metadata store"
                    );
                    missing.push(identifier.clone());
                }
            }
        }

        tracing::debug!(
            matched = identifiers.len(),
            returned = records.len(),
            "Search completed"
        );
        Ok(SearchOutcome {
            matched: identifiers.len(),
            records,
            missing,
        })
    }

    pub async fn get_record(
        &self,
        identifier: &str,
        mode: MetadataMode,
        element_set: ElementSetType,
        element_names: &[String],
    ) -> Result<Option<MetadataRecord>> {
        self.reader
            .get_metadata(identifier, mode, element_set, element_names)
            .await
    }

    /// Rebuild the index from the reader and make it visible to searches.
    pub async fn rebuild_index(&self) -> Result<usize> {
        let count = self.indexer.create_index(self.reader.as_ref()).await?;
        self.searcher.refresh()?;
        Ok(count)
    }

    /// Re-index one record from the store. A record missing from the store is
    /// removed from the index instead.
    pub async fn reindex_record(&self, identifier: &str) -> Result<bool> {
        let record = self
            .reader
            .get_metadata(identifier, MetadataMode::Iso19115, ElementSetType::Full, &[])
            .await?;

        let found = match record {
            Some(record) => {
                self.indexer.index_document(&record)?;
                true
            }
            None => {
                self.indexer.remove_document(identifier)?;
                false
            }
        };
        self.searcher.refresh()?;
        Ok(found)
    }

    pub fn remove_record(&self, identifier: &str) -> Result<()> {
        self.indexer.remove_document(identifier)?;
        self.searcher.refresh()
    }
}
