//! Persistence of in-progress wizard state.
//!
//! Two string keys: one holds the serialized record, one the current
//! screen name. The store is a trait so the application loop can be
//! tested against an in-memory implementation.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use color_eyre::Result;
use tracing::warn;

use crate::machine::Screen;
use crate::record::EnrollmentRecord;

/// Store key holding the serialized record.
pub const FORM_DATA_KEY: &str = "form-data";
/// Store key holding the current screen name.
pub const CURRENT_SCREEN_KEY: &str = "current-screen";
/// File name of the on-disk store document inside the data directory.
pub const STORE_FILE: &str = "wizard-store.json";

/// Synchronous string key-value storage. Single process, no contention.
pub trait StateStore {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Store backed by a single JSON object document on disk. The document is
/// read once at construction and rewritten on every mutation.
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing or unreadable document starts
    /// empty; a corrupt one is discarded with a warning. Persistence
    /// failures must never take the wizard down.
    pub fn new(path: PathBuf) -> Self {
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("discarding corrupt store document {}: {err}", path.display());
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

/// In-process store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Read the persisted record. Missing or corrupt data yields an empty
/// record, never an error.
pub fn load_record(store: &dyn StateStore) -> EnrollmentRecord {
    store
        .get(FORM_DATA_KEY)
        .and_then(|raw| match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("discarding corrupt persisted record: {err}");
                None
            }
        })
        .unwrap_or_default()
}

pub fn save_record(store: &mut dyn StateStore, record: &EnrollmentRecord) -> Result<()> {
    store.put(FORM_DATA_KEY, &serde_json::to_string(record)?)
}

pub fn save_screen(store: &mut dyn StateStore, screen: Screen) -> Result<()> {
    store.put(CURRENT_SCREEN_KEY, &screen.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record() -> EnrollmentRecord {
        EnrollmentRecord {
            phone: "123456789".into(),
            email: "jane@example.com".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
        }
    }

    #[test]
    fn file_store_round_trips_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);

        let mut store = FileStore::new(path.clone());
        save_record(&mut store, &record()).unwrap();
        save_screen(&mut store, Screen::Summary).unwrap();
        drop(store);

        let reopened = FileStore::new(path);
        assert_eq!(load_record(&reopened), record());
        assert_eq!(reopened.get(CURRENT_SCREEN_KEY).as_deref(), Some("summary"));
    }

    #[test]
    fn corrupt_document_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        fs::write(&path, "{ not json").unwrap();

        let store = FileStore::new(path);
        assert_eq!(store.get(FORM_DATA_KEY), None);
        assert_eq!(load_record(&store), EnrollmentRecord::default());
    }

    #[test]
    fn corrupt_record_value_degrades_to_default() {
        let mut store = MemoryStore::default();
        store.put(FORM_DATA_KEY, "][").unwrap();
        assert_eq!(load_record(&store), EnrollmentRecord::default());
    }

    #[test]
    fn remove_deletes_only_the_given_key() {
        let mut store = MemoryStore::default();
        save_record(&mut store, &record()).unwrap();
        save_screen(&mut store, Screen::Contact).unwrap();

        store.remove(FORM_DATA_KEY).unwrap();
        assert_eq!(store.get(FORM_DATA_KEY), None);
        assert_eq!(store.get(CURRENT_SCREEN_KEY).as_deref(), Some("contact"));
    }

    #[test]
    fn removing_missing_key_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join(STORE_FILE));
        store.remove("never-written").unwrap();
        assert!(!store.path().exists());
    }
}
