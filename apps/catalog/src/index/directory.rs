//! Committed index storage
//!
//! A directory holds the latest committed [`IndexData`]. Writers load it,
//! apply their pending operations and commit a new generation; searchers
//! load it on open and on every refresh.

use crate::index::Document;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// One committed generation of the index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexData {
    pub generation: u64,
    /// Fields whose values compare as numbers.
    #[serde(default)]
    pub numeric_fields: BTreeSet<String>,
    /// Documents in index order.
    #[serde(default)]
    pub documents: Vec<Document>,
}

/// Storage for committed index generations.
pub trait IndexDirectory: Send + Sync {
    /// Latest committed data; an empty index when nothing was committed yet.
    fn load(&self) -> Result<IndexData>;

    /// Atomically replace the committed data.
    fn commit(&self, data: &IndexData) -> Result<()>;
}

/// In-process directory. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    data: Arc<RwLock<IndexData>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IndexDirectory for MemoryDirectory {
    fn load(&self) -> Result<IndexData> {
        Ok(self
            .data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn commit(&self, data: &IndexData) -> Result<()> {
        *self.data.write().unwrap_or_else(PoisonError::into_inner) = data.clone();
        Ok(())
    }
}

const INDEX_FILE: &str = "index.json";
const INDEX_TMP_FILE: &str = "index.json.tmp";

/// Directory on disk. The index is one JSON file replaced by write-then-rename,
/// so readers in other processes never observe a partial commit.
#[derive(Debug, Clone)]
pub struct FsDirectory {
    root: PathBuf,
}

impl FsDirectory {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn index_file(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }
}

impl IndexDirectory for FsDirectory {
    fn load(&self) -> Result<IndexData> {
        let path = self.index_file();
        if !path.exists() {
            return Ok(IndexData::default());
        }
        let bytes = fs::read(&path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn commit(&self, data: &IndexData) -> Result<()> {
        let tmp = self.root.join(INDEX_TMP_FILE);
        {
            let mut file = fs::File::create(&tmp)?;
            serde_json::to_writer(&mut file, data)?;
            file.flush()?;
            file.sync_all()?;
        }
        fs::rename(&tmp, self.index_file())?;

        tracing::debug!(
            directory = %self.root.display(),
            generation = data.generation,
            documents = data.documents.len(),
            "Index committed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(generation: u64) -> IndexData {
        IndexData {
            generation,
            numeric_fields: ["WestBoundLongitude".to_string()].into_iter().collect(),
            documents: vec![Document::new("a"), Document::new("b")],
        }
    }

    #[test]
    fn memory_directory_clones_share_storage() {
        let dir = MemoryDirectory::new();
        let other = dir.clone();
        dir.commit(&sample(3)).unwrap();
        assert_eq!(other.load().unwrap(), sample(3));
    }

    #[test]
    fn fs_directory_persists_commits() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = FsDirectory::open(tmp.path().join("index")).unwrap();
        assert_eq!(dir.load().unwrap(), IndexData::default());

        dir.commit(&sample(1)).unwrap();
        dir.commit(&sample(2)).unwrap();

        let reopened = FsDirectory::open(dir.root()).unwrap();
        assert_eq!(reopened.load().unwrap(), sample(2));
        assert!(!dir.root().join(INDEX_TMP_FILE).exists());
    }
}
