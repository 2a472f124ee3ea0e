//! Metadata path expressions
//!
//! Parses and evaluates the colon-separated path mini-language used to pull
//! queryable values out of ISO 19115, ISO 19115-2 and Dublin Core records:
//!
//! ```rust
//! use constellation_path::{MetadataPath, PathTarget};
//! use serde_json::{json, Value};
//!
//! struct Iso(Value);
//!
//! impl PathTarget for Iso {
//!     fn standard(&self) -> &str { "ISO 19115" }
//!     fn root_class(&self) -> &str { "MD_Metadata" }
//!     fn content(&self) -> &Value { &self.0 }
//! }
//!
//! let record = Iso(json!({
//!     "identificationInfo": {"citation": {"title": "Sea surface temperature"}}
//! }));
//! let path = MetadataPath::parse("ISO 19115:MD_Metadata:identificationInfo:citation:title").unwrap();
//! assert_eq!(path.resolve(&record), vec!["Sea surface temperature"]);
//! ```

pub mod error;
pub mod path;
pub mod resolve;
pub mod value;

pub use error::{Error, Result};
pub use path::{Discriminator, MetadataPath, PathStep};
pub use resolve::PathTarget;
pub use value::{leaf_value, normalize_temporal};
