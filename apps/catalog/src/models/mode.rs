//! Output modes and element sets requested from readers

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Representation a reader is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetadataMode {
    #[serde(rename = "ISO_19115")]
    Iso19115,
    #[serde(rename = "DUBLINCORE")]
    DublinCore,
    Native,
}

impl MetadataMode {
    /// Integer codes used by older clients.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            1 => Ok(MetadataMode::DublinCore),
            2 => Ok(MetadataMode::Iso19115),
            3 => Ok(MetadataMode::Native),
            other => Err(Error::InvalidArgument(format!(
                "Unknown metadata mode code: {other}"
            ))),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            MetadataMode::DublinCore => 1,
            MetadataMode::Iso19115 => 2,
            MetadataMode::Native => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataMode::Iso19115 => "ISO_19115",
            MetadataMode::DublinCore => "DUBLINCORE",
            MetadataMode::Native => "NATIVE",
        }
    }
}

impl fmt::Display for MetadataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetadataMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(code) = s.parse::<i32>() {
            return Self::from_code(code);
        }
        match s.to_ascii_uppercase().as_str() {
            "ISO_19115" => Ok(MetadataMode::Iso19115),
            "DUBLINCORE" => Ok(MetadataMode::DublinCore),
            "NATIVE" => Ok(MetadataMode::Native),
            _ => Err(Error::InvalidArgument(format!("Unknown metadata mode: {s}"))),
        }
    }
}

/// CSW element set: how much of a record to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementSetType {
    Brief,
    Summary,
    #[default]
    Full,
}

impl ElementSetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementSetType::Brief => "BRIEF",
            ElementSetType::Summary => "SUMMARY",
            ElementSetType::Full => "FULL",
        }
    }
}

impl fmt::Display for ElementSetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementSetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brief" => Ok(ElementSetType::Brief),
            "summary" => Ok(ElementSetType::Summary),
            "full" => Ok(ElementSetType::Full),
            _ => Err(Error::InvalidArgument(format!("Unknown element set: {s}"))),
        }
    }
}
