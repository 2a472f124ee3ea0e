//! Contact directory
//!
//! Contacts are responsible-party objects stored one per JSON file and keyed
//! by file stem. Files that cannot be read or parsed are logged and skipped,
//! so the directory may end up partially populated.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct ContactDirectory {
    contacts: BTreeMap<String, Value>,
}

impl ContactDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.json` file of `dir`. A missing directory yields an empty
    /// contact map.
    pub fn load(dir: &Path) -> Self {
        let mut contacts = BTreeMap::new();

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(directory = %dir.display(), error = %e, "Cannot read contact directory");
                return Self { contacts };
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };

            let parsed = fs::read(&path)
                .map_err(|e| e.to_string())
                .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).map_err(|e| e.to_string()));
            match parsed {
                Ok(contact) if contact.is_object() => {
                    contacts.insert(id, contact);
                }
                Ok(_) => {
                    tracing::warn!(file = %path.display(), "Skipping contact file that is not a JSON object");
                }
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "Skipping unreadable contact file");
                }
            }
        }

        tracing::info!(
            directory = %dir.display(),
            count = contacts.len(),
            "Contacts loaded"
        );
        Self { contacts }
    }

    pub fn insert(&mut self, id: impl Into<String>, contact: Value) {
        self.contacts.insert(id.into(), contact);
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.contacts.get(id)
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}
