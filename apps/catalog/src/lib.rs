//! Constellation - metadata catalog search core
//!
//! Indexes ISO 19115 and Dublin Core metadata records and answers combined
//! text and spatial queries:
//! - Path expressions select record values per queryable
//! - An inverted index with envelopes per document
//! - Query trees mixing Lucene-style text and spatial filters
//! - Readers assembling records from a relational store

#![allow(clippy::too_many_arguments)]

pub mod config;
pub mod db;
pub mod error;
pub mod index;
pub mod indexer;
pub mod logging;
pub mod models;
pub mod reader;
pub mod search;
pub mod services;

pub use config::Config;
pub use error::{Error, Result};
