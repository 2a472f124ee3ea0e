//! Metadata records as stored and returned by the catalog

use crate::{Error, Result};
use constellation_path::PathTarget;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Metadata standards understood by the indexer and readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Standard {
    #[serde(rename = "ISO 19115")]
    Iso19115,
    #[serde(rename = "ISO 19115-2")]
    Iso19115_2,
    /// Dublin Core as served by CSW.
    #[serde(rename = "Catalog Web Service")]
    DublinCore,
    #[serde(rename = "SensorML")]
    SensorMl,
}

impl Standard {
    pub fn name(&self) -> &'static str {
        match self {
            Standard::Iso19115 => "ISO 19115",
            Standard::Iso19115_2 => "ISO 19115-2",
            Standard::DublinCore => "Catalog Web Service",
            Standard::SensorMl => "SensorML",
        }
    }

    /// Root class of records written in this standard.
    pub fn default_root(&self) -> &'static str {
        match self {
            Standard::Iso19115 => "MD_Metadata",
            Standard::Iso19115_2 => "MI_Metadata",
            Standard::DublinCore => "Record",
            Standard::SensorMl => "SensorML",
        }
    }
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Standard {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        [
            Standard::Iso19115,
            Standard::Iso19115_2,
            Standard::DublinCore,
            Standard::SensorMl,
        ]
        .into_iter()
        .find(|standard| standard.name().eq_ignore_ascii_case(s))
        .ok_or_else(|| Error::InvalidArgument(format!("Unknown metadata standard: {s}")))
    }
}

/// A metadata record: identifier, standard, root class and content tree.
///
/// Content is a JSON object graph. Code lists are encoded as
/// `{"codeListValue": "..."}` and wrapped scalars as `{"value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub identifier: String,
    pub standard: Standard,
    pub root_class: String,
    pub content: Value,
}

impl MetadataRecord {
    pub fn new(
        identifier: impl Into<String>,
        standard: Standard,
        root_class: impl Into<String>,
        content: Value,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            standard,
            root_class: root_class.into(),
            content,
        }
    }

    /// ISO 19115 record rooted at `MD_Metadata`.
    pub fn iso(identifier: impl Into<String>, content: Value) -> Self {
        Self::new(
            identifier,
            Standard::Iso19115,
            Standard::Iso19115.default_root(),
            content,
        )
    }

    /// Dublin Core record rooted at `Record`.
    pub fn dublin_core(identifier: impl Into<String>, content: Value) -> Self {
        Self::new(
            identifier,
            Standard::DublinCore,
            Standard::DublinCore.default_root(),
            content,
        )
    }
}

impl PathTarget for MetadataRecord {
    fn standard(&self) -> &str {
        self.standard.name()
    }

    fn root_class(&self) -> &str {
        &self.root_class
    }

    fn content(&self) -> &Value {
        &self.content
    }
}
