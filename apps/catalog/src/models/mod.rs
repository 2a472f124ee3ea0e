//! Domain models for the metadata catalog

pub mod envelope;
pub mod mode;
pub mod record;

pub use envelope::Envelope;
pub use mode::{ElementSetType, MetadataMode};
pub use record::{MetadataRecord, Standard};
