//! Error types for the catalog search core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid path expression: {0}")]
    Path(#[from] constellation_path::Error),

    #[error("Query parse error: {0}")]
    QueryParse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Index searcher has been closed")]
    IndexClosed,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::QueryParse(_)
                | Error::Validation(_)
                | Error::InvalidArgument(_)
                | Error::Path(_)
                | Error::NotFound(_)
        )
    }
}
