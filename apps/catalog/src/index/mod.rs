//! Text index: analysis, documents, storage and snapshots

pub mod analysis;
pub mod directory;
pub mod document;
pub mod snapshot;
pub mod writer;

pub use directory::{FsDirectory, IndexData, IndexDirectory, MemoryDirectory};
pub use document::{
    Document, ANY_TEXT_FIELD, ID_FIELD, METAFILE_FIELD, METAFILE_VALUE, OBJECT_TYPE_FIELD,
};
pub use snapshot::{FieldPostings, IndexSnapshot, Posting};
pub use writer::IndexWriter;
