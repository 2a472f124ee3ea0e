//! Indexed documents

use crate::models::Envelope;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field holding the record identifier.
pub const ID_FIELD: &str = "id";
/// Field holding the record root class.
pub const OBJECT_TYPE_FIELD: &str = "objectType";
/// Field present on every document with value [`METAFILE_VALUE`].
pub const METAFILE_FIELD: &str = "metafile";
pub const METAFILE_VALUE: &str = "doc";
/// Catch-all field holding every resolved queryable value.
pub const ANY_TEXT_FIELD: &str = "AnyText";

/// Flat field/value view of one metadata record, plus its envelopes.
///
/// Built once at index time and never mutated after commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    identifier: String,
    fields: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    envelopes: Vec<Envelope>,
}

impl Document {
    pub fn new(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let mut fields = BTreeMap::new();
        fields.insert(ID_FIELD.to_string(), vec![identifier.clone()]);
        Self {
            identifier,
            fields,
            envelopes: Vec::new(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(name.into()).or_default().push(value.into());
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_field(name, value);
        self
    }

    pub fn values(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first_value(&self, name: &str) -> Option<&str> {
        self.values(name).first().map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn add_envelope(&mut self, envelope: Envelope) {
        self.envelopes.push(envelope);
    }

    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.add_envelope(envelope);
        self
    }

    pub fn envelopes(&self) -> &[Envelope] {
        &self.envelopes
    }
}
