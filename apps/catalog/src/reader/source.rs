//! Variable sources: where the generic reader loads record values from

use crate::reader::Values;
use crate::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};

/// Loads named variables for a record identifier.
#[async_trait]
pub trait VariableSource: Send + Sync {
    /// Values of the requested variables for one record. Variables without a
    /// value are simply absent; an unknown identifier yields empty values.
    async fn load_values(&self, identifier: &str, variables: &[String]) -> Result<Values>;

    /// Every record identifier, in a stable order.
    async fn list_identifiers(&self) -> Result<Vec<String>>;
}

/// In-memory source, mostly for tests and small fixed catalogs.
#[derive(Debug, Clone, Default)]
pub struct MemoryVariableSource {
    records: BTreeMap<String, HashMap<String, Vec<String>>>,
}

impl MemoryVariableSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        identifier: impl Into<String>,
        variable: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.records
            .entry(identifier.into())
            .or_default()
            .entry(variable.into())
            .or_default()
            .push(value.into());
    }

    pub fn with_value(
        mut self,
        identifier: impl Into<String>,
        variable: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.insert(identifier, variable, value);
        self
    }

    pub fn remove(&mut self, identifier: &str) {
        self.records.remove(identifier);
    }
}

#[async_trait]
impl VariableSource for MemoryVariableSource {
    async fn load_values(&self, identifier: &str, variables: &[String]) -> Result<Values> {
        let mut values = Values::new();
        let Some(record) = self.records.get(identifier) else {
            return Ok(values);
        };
        for variable in variables {
            for value in record.get(variable).into_iter().flatten() {
                values.push(variable.clone(), value.clone());
            }
        }
        Ok(values)
    }

    async fn list_identifiers(&self) -> Result<Vec<String>> {
        Ok(self.records.keys().cloned().collect())
    }
}
