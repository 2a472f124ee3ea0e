//! Metadata readers
//!
//! A [`MetadataReader`] returns records from the metadata store. The generic
//! implementation loads only the variables a [`ReaderDialect`] needs from a
//! [`VariableSource`] and lets the dialect assemble the record.

pub mod contacts;
pub mod dialect;
pub mod sdn;
pub mod source;
pub mod values;

pub use contacts::ContactDirectory;
pub use dialect::{select_dublin_core_elements, ReaderDialect, DUBLIN_CORE_ELEMENTS};
pub use sdn::{SdnDialect, SdnProfile};
pub use source::{MemoryVariableSource, VariableSource};
pub use values::Values;

use crate::models::{ElementSetType, MetadataMode, MetadataRecord};
use crate::Result;
use async_trait::async_trait;

/// Read access to the metadata store.
#[async_trait]
pub trait MetadataReader: Send + Sync {
    /// Get one record in the requested representation.
    ///
    /// # Arguments
    /// * `identifier` - Record identifier
    /// * `mode` - Output representation
    /// * `element_set` - How much of the record to return
    /// * `element_names` - Explicit element selection; overrides `element_set`
    ///   when non-empty
    ///
    /// # Returns
    /// `None` when the store has no record with this identifier.
    async fn get_metadata(
        &self,
        identifier: &str,
        mode: MetadataMode,
        element_set: ElementSetType,
        element_names: &[String],
    ) -> Result<Option<MetadataRecord>>;

    /// Every record of the store, as full ISO 19115.
    async fn get_all_entries(&self) -> Result<Vec<MetadataRecord>>;

    async fn get_all_identifiers(&self) -> Result<Vec<String>>;
}

pub struct GenericMetadataReader<D, S> {
    dialect: D,
    source: S,
}

impl<D: ReaderDialect, S: VariableSource> GenericMetadataReader<D, S> {
    pub fn new(dialect: D, source: S) -> Self {
        Self { dialect, source }
    }

    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[async_trait]
impl<D: ReaderDialect, S: VariableSource> MetadataReader for GenericMetadataReader<D, S> {
    async fn get_metadata(
        &self,
        identifier: &str,
        mode: MetadataMode,
        element_set: ElementSetType,
        element_names: &[String],
    ) -> Result<Option<MetadataRecord>> {
        let variables = match mode {
            MetadataMode::Iso19115 | MetadataMode::Native => self.dialect.variables_for_iso(),
            MetadataMode::DublinCore => self
                .dialect
                .variables_for_dublin_core(element_set, element_names),
        };

        let values = self.source.load_values(identifier, &variables).await?;
        if values.is_empty() {
            tracing::debug!(identifier, %mode, "No values for record");
            return Ok(None);
        }

        let record = match mode {
            MetadataMode::Iso19115 | MetadataMode::Native => {
                self.dialect.get_iso(identifier, &values)?
            }
            MetadataMode::DublinCore => {
                self.dialect
                    .get_dublin_core(identifier, &values, element_set, element_names)?
            }
        };
        Ok(Some(record))
    }

    async fn get_all_entries(&self) -> Result<Vec<MetadataRecord>> {
        let identifiers = self.source.list_identifiers().await?;
        let mut records = Vec::with_capacity(identifiers.len());
        for identifier in &identifiers {
            match self
                .get_metadata(identifier, MetadataMode::Iso19115, ElementSetType::Full, &[])
                .await?
            {
                Some(record) => records.push(record),
                None => tracing::warn!(identifier = %identifier, "Listed record has no values"),
            }
        }
        tracing::debug!(count = records.len(), "Loaded all entries");
        Ok(records)
    }

    async fn get_all_identifiers(&self) -> Result<Vec<String>> {
        self.source.list_identifiers().await
    }
}
