//! Path expression syntax
//!
//! A path names a metadata standard, the root class of the record and a chain
//! of properties leading to a leaf value, all separated by `:`:
//!
//! ```text
//! ISO 19115:MD_Metadata:identificationInfo:citation:date#dateType=creation:date
//! └─standard┘ └─root────┘ └─step──────────┘ └─step─┘ └─step + discriminator┘ └leaf┘
//! ```
//!
//! A step may carry a `#attribute=value` discriminator that keeps only the
//! elements of a repeated property whose `attribute` equals `value`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Selects among repeated elements by the value of one of their attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discriminator {
    pub attribute: String,
    pub value: String,
}

/// One property traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub property: String,
    pub discriminator: Option<Discriminator>,
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataPath {
    standard: String,
    root: String,
    steps: SmallVec<[PathStep; 6]>,
}

impl MetadataPath {
    /// Parse a path expression.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyPath);
        }

        let segments: Vec<&str> = trimmed.split(':').collect();
        if segments.len() < 3 {
            return Err(Error::TooShort {
                path: trimmed.to_string(),
            });
        }

        for (position, segment) in segments.iter().enumerate() {
            if segment.trim().is_empty() {
                return Err(Error::EmptySegment {
                    path: trimmed.to_string(),
                    position,
                });
            }
        }

        let standard = segments[0].trim().to_string();
        let root = segments[1].trim().to_string();
        let mut steps = SmallVec::new();
        for segment in &segments[2..] {
            steps.push(parse_step(trimmed, segment.trim())?);
        }

        Ok(Self {
            standard,
            root,
            steps,
        })
    }

    /// Name of the metadata standard the path applies to (e.g. `ISO 19115`).
    pub fn standard(&self) -> &str {
        &self.standard
    }

    /// Root class of the record (e.g. `MD_Metadata`, `Record`).
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Name of the leaf property.
    pub fn leaf(&self) -> &str {
        // parse() guarantees at least one step
        self.steps
            .last()
            .map(|s| s.property.as_str())
            .unwrap_or_default()
    }
}

fn parse_step(path: &str, segment: &str) -> Result<PathStep> {
    let Some((property, discriminator)) = segment.split_once('#') else {
        return Ok(PathStep {
            property: segment.to_string(),
            discriminator: None,
        });
    };

    let invalid = || Error::InvalidDiscriminator {
        path: path.to_string(),
        discriminator: discriminator.to_string(),
    };

    let (attribute, value) = discriminator.split_once('=').ok_or_else(invalid)?;
    let attribute = attribute.trim();
    let value = value.trim();
    if attribute.is_empty() || value.is_empty() || property.trim().is_empty() {
        return Err(invalid());
    }

    Ok(PathStep {
        property: property.trim().to_string(),
        discriminator: Some(Discriminator {
            attribute: attribute.to_string(),
            value: value.to_string(),
        }),
    })
}

impl FromStr for MetadataPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for MetadataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.standard, self.root)?;
        for step in &self.steps {
            write!(f, ":{}", step.property)?;
            if let Some(d) = &step.discriminator {
                write!(f, "#{}={}", d.attribute, d.value)?;
            }
        }
        Ok(())
    }
}
