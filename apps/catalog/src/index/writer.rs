use crate::index::{Document, IndexDirectory};
use crate::Result;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

#[derive(Debug)]
enum PendingOp {
    Add(Document),
    Remove(String),
    DeleteAll,
}

/// Buffers index changes and applies them in one commit.
///
/// A single writer per directory is assumed; concurrent writers would lose
/// each other's updates.
pub struct IndexWriter {
    directory: Arc<dyn IndexDirectory>,
    numeric_fields: BTreeSet<String>,
    pending: Vec<PendingOp>,
}

impl IndexWriter {
    pub fn new(directory: Arc<dyn IndexDirectory>) -> Self {
        Self {
            directory,
            numeric_fields: BTreeSet::new(),
            pending: Vec::new(),
        }
    }

    /// Declare fields whose values compare as numbers.
    pub fn with_numeric_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_fields
            .extend(fields.into_iter().map(Into::into));
        self
    }

    /// Add a document, replacing any document with the same identifier.
    pub fn add_document(&mut self, document: Document) {
        self.pending.push(PendingOp::Add(document));
    }

    pub fn remove_document(&mut self, identifier: impl Into<String>) {
        self.pending.push(PendingOp::Remove(identifier.into()));
    }

    pub fn delete_all(&mut self) {
        self.pending.push(PendingOp::DeleteAll);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Apply pending operations to the latest committed data and commit a
    /// new generation. Returns that generation.
    pub fn commit(&mut self) -> Result<u64> {
        let mut data = self.directory.load()?;

        // Removed documents leave an empty slot, compacted once at the end
        let mut slots: Vec<Option<Document>> =
            std::mem::take(&mut data.documents).into_iter().map(Some).collect();
        let mut positions: HashMap<String, usize> = slots
            .iter()
            .enumerate()
            .filter_map(|(i, d)| d.as_ref().map(|d| (d.identifier().to_string(), i)))
            .collect();

        for op in &self.pending {
            match op {
                PendingOp::Add(document) => {
                    // Replaced documents move to the end of the index order
                    if let Some(old) = positions.remove(document.identifier()) {
                        slots[old] = None;
                    }
                    positions.insert(document.identifier().to_string(), slots.len());
                    slots.push(Some(document.clone()));
                }
                PendingOp::Remove(identifier) => {
                    if let Some(old) = positions.remove(identifier.as_str()) {
                        slots[old] = None;
                    }
                }
                PendingOp::DeleteAll => {
                    slots.clear();
                    positions.clear();
                }
            }
        }
        data.documents = slots.into_iter().flatten().collect();

        data.numeric_fields.extend(self.numeric_fields.iter().cloned());
        data.generation += 1;
        // Pending operations survive a failed commit
        self.directory.commit(&data)?;
        self.pending.clear();

        tracing::debug!(
            generation = data.generation,
            documents = data.documents.len(),
            "Index writer committed"
        );
        Ok(data.generation)
    }
}
