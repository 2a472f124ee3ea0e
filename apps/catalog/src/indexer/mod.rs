//! Generic metadata indexer
//!
//! Turns metadata records into index documents by evaluating every queryable's
//! path expressions, then commits them through an [`IndexWriter`].

pub mod queryables;

use crate::config::IndexConfig;
use crate::index::{
    Document, IndexDirectory, IndexWriter, ANY_TEXT_FIELD, METAFILE_FIELD, METAFILE_VALUE,
    OBJECT_TYPE_FIELD,
};
use crate::models::{Envelope, MetadataRecord};
use crate::reader::MetadataReader;
use crate::Result;
use constellation_path::{MetadataPath, PathTarget};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

pub use queryables::{
    default_queryables, EAST_FIELD, NORTH_FIELD, NUMERIC_QUERYABLES, SOUTH_FIELD, WEST_FIELD,
};

/// Value returned by [`extract_values`] when no path resolves.
pub const NULL_VALUE: &str = "null";

/// Resolve the first path (in order) that yields at least one non-null leaf.
///
/// Multiple leaves are joined with `,`. When no path resolves the result is
/// [`NULL_VALUE`]. Paths that fail to parse are logged and skipped.
pub fn extract_values<T, P>(metadata: &T, paths: &[P]) -> String
where
    T: PathTarget + ?Sized,
    P: AsRef<str>,
{
    for raw in paths {
        let raw = raw.as_ref();
        let path = match MetadataPath::parse(raw) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(path = raw, error = %e, "Skipping unparseable metadata path");
                continue;
            }
        };

        let values = path.resolve(metadata);
        if !values.is_empty() {
            return values.join(",");
        }
    }
    NULL_VALUE.to_string()
}

pub struct GenericIndexer {
    directory: Arc<dyn IndexDirectory>,
    queryables: BTreeMap<String, Vec<String>>,
    numeric_fields: BTreeSet<String>,
}

impl GenericIndexer {
    /// Indexer over the built-in queryables.
    pub fn new(directory: Arc<dyn IndexDirectory>) -> Self {
        Self {
            directory,
            queryables: default_queryables(),
            numeric_fields: NUMERIC_QUERYABLES.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Indexer over the built-in queryables plus those configured in `index`.
    pub fn from_config(directory: Arc<dyn IndexDirectory>, config: &IndexConfig) -> Self {
        let mut indexer = Self::new(directory);
        for (name, paths) in &config.additional_queryables {
            indexer.add_queryable(name.clone(), paths.clone());
        }
        indexer
            .numeric_fields
            .extend(config.numeric_fields.iter().cloned());
        indexer
    }

    /// Add or replace a queryable.
    pub fn add_queryable(&mut self, name: impl Into<String>, paths: Vec<String>) {
        self.queryables.insert(name.into(), paths);
    }

    pub fn queryables(&self) -> &BTreeMap<String, Vec<String>> {
        &self.queryables
    }

    fn writer(&self) -> IndexWriter {
        IndexWriter::new(self.directory.clone()).with_numeric_fields(self.numeric_fields.clone())
    }

    /// Build the index document of one record.
    pub fn create_document(&self, metadata: &MetadataRecord) -> Document {
        let mut doc = Document::new(metadata.identifier.clone());
        doc.add_field(OBJECT_TYPE_FIELD, metadata.root_class.clone());
        doc.add_field(METAFILE_FIELD, METAFILE_VALUE);

        for (name, paths) in &self.queryables {
            let value = extract_values(metadata, paths);
            if value == NULL_VALUE {
                doc.add_field(name.clone(), value);
                continue;
            }

            doc.add_field(ANY_TEXT_FIELD, value.clone());
            if self.numeric_fields.contains(name) {
                for part in value.split(',') {
                    doc.add_field(name.clone(), part.trim());
                }
            } else {
                doc.add_field(name.clone(), value);
            }
        }

        for envelope in self.envelopes(metadata) {
            doc.add_envelope(envelope);
        }
        doc
    }

    /// Envelopes from the bounding-box queryables; the n-th values of the four
    /// fields form the n-th envelope.
    fn envelopes(&self, metadata: &MetadataRecord) -> Vec<Envelope> {
        let coordinate = |field: &str| -> Option<Vec<String>> {
            let value = extract_values(metadata, self.queryables.get(field)?);
            if value == NULL_VALUE {
                return None;
            }
            Some(value.split(',').map(|v| v.trim().to_string()).collect())
        };

        let (Some(west), Some(east), Some(south), Some(north)) = (
            coordinate(WEST_FIELD),
            coordinate(EAST_FIELD),
            coordinate(SOUTH_FIELD),
            coordinate(NORTH_FIELD),
        ) else {
            return Vec::new();
        };

        let mut envelopes = Vec::new();
        for (((w, e), s), n) in west.iter().zip(&east).zip(&south).zip(&north) {
            let parsed = (
                w.parse::<f64>(),
                s.parse::<f64>(),
                e.parse::<f64>(),
                n.parse::<f64>(),
            );
            match parsed {
                (Ok(min_x), Ok(min_y), Ok(max_x), Ok(max_y)) => {
                    let envelope = Envelope::new(min_x, min_y, max_x, max_y);
                    if envelope.is_valid() {
                        envelopes.push(envelope);
                    } else {
                        tracing::warn!(
                            identifier = %metadata.identifier,
                            ?envelope,
                            "Skipping invalid bounding box"
                        );
                    }
                }
                _ => tracing::warn!(
                    identifier = %metadata.identifier,
                    west = %w, east = %e, south = %s, north = %n,
                    "Skipping non-numeric bounding box"
                ),
            }
        }
        envelopes
    }

    /// Add or replace one record and commit.
    pub fn index_document(&self, metadata: &MetadataRecord) -> Result<()> {
        let mut writer = self.writer();
        writer.add_document(self.create_document(metadata));
        writer.commit()?;
        tracing::debug!(identifier = %metadata.identifier, "Record indexed");
        Ok(())
    }

    /// Add or replace a batch of records in one commit.
    pub fn index_documents(&self, records: &[MetadataRecord]) -> Result<usize> {
        let mut writer = self.writer();
        for record in records {
            writer.add_document(self.create_document(record));
        }
        writer.commit()?;
        tracing::info!(count = records.len(), "Records indexed");
        Ok(records.len())
    }

    /// Remove one record and commit. Unknown identifiers are not an error.
    pub fn remove_document(&self, identifier: &str) -> Result<()> {
        let mut writer = self.writer();
        writer.remove_document(identifier);
        writer.commit()?;
        tracing::debug!(identifier, "Record removed from index");
        Ok(())
    }

    /// Rebuild the whole index from a reader in one commit.
    pub async fn create_index(&self, reader: &dyn MetadataReader) -> Result<usize> {
        let records = reader.get_all_entries().await?;

        let mut writer = self.writer();
        writer.delete_all();
        for record in &records {
            writer.add_document(self.create_document(record));
        }
        let generation = writer.commit()?;

        tracing::info!(
            count = records.len(),
            generation,
            "Index rebuilt"
        );
        Ok(records.len())
    }
}
