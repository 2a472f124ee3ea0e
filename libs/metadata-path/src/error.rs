//! Error types for metadata path expressions

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Empty path expression")]
    EmptyPath,

    #[error("Path '{path}' must name a standard, a root class and at least one property")]
    TooShort { path: String },

    #[error("Empty segment at position {position} in path '{path}'")]
    EmptySegment { path: String, position: usize },

    #[error("Invalid discriminator '{discriminator}' in path '{path}' (expected '#attribute=value')")]
    InvalidDiscriminator { path: String, discriminator: String },
}
