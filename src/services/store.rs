//! Client-side key-value persistence for settings and the form draft
//!
//! `SessionStore` is handed to the app at startup. It loads on demand, writes
//! on explicit commit, and is cleared on an explicit signal.

use crate::model::settings::{FormDraft, Settings};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

pub const SETTINGS_KEY: &str = "settings";
pub const FORM_DRAFT_KEY: &str = "formDraft";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("stored value for {key} is malformed: {source}")]
    Serde {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// In-memory store, used offline in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.values.clear();
        Ok(())
    }
}

/// A single JSON object on disk, rewritten on every change
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl FileStore {
    /// Open the store, starting empty when the file is missing or unreadable
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring malformed state file");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, values }
    }

    fn flush(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let contents = serde_json::to_string_pretty(&self.values).map_err(|source| {
            StoreError::Serde {
                key: "*".to_string(),
                source,
            }
        })?;
        fs::write(&self.path, contents).map_err(io_err)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.values.clear();
        self.flush()
    }
}

/// Typed access to the settings and draft keys
pub struct SessionStore {
    store: Box<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::<MemoryStore>::default())
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.store.get(key)?;
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(key, error = %e, "ignoring malformed stored value");
                None
            }
        }
    }

    fn save<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value).map_err(|source| StoreError::Serde {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, value)
    }

    /// Stored settings, or defaults when none were saved
    pub fn load_settings(&self) -> Settings {
        self.load(SETTINGS_KEY).unwrap_or_default()
    }

    pub fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError> {
        debug!(?settings, "saving settings");
        self.save(SETTINGS_KEY, settings)
    }

    pub fn load_draft(&self) -> Option<FormDraft> {
        self.load::<FormDraft>(FORM_DRAFT_KEY)
            .filter(|draft| !draft.is_blank())
    }

    pub fn save_draft(&mut self, draft: &FormDraft) -> Result<(), StoreError> {
        self.save(FORM_DRAFT_KEY, draft)
    }

    pub fn clear_draft(&mut self) -> Result<(), StoreError> {
        self.store.remove(FORM_DRAFT_KEY)
    }

    /// React to the navigation that follows a form submission.
    /// A query mentioning `success` means the draft was accepted.
    pub fn on_navigation(&mut self, query: &str) -> Result<bool, StoreError> {
        if query.contains("success") {
            self.clear_draft()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Forget everything
    pub fn clear_all(&mut self) -> Result<(), StoreError> {
        self.store.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn draft_with_email(email: &str) -> FormDraft {
        let mut draft = FormDraft::default();
        draft.set("email", email);
        draft
    }

    #[test]
    fn test_settings_round_trip() {
        let mut store = SessionStore::in_memory();
        assert_eq!(store.load_settings(), Settings::default());

        let settings = Settings {
            dark_mode: true,
            sound_notif: true,
            ..Default::default()
        };
        store.save_settings(&settings).unwrap();
        assert_eq!(store.load_settings(), settings);
    }

    #[test]
    fn test_draft_cleared_on_success_navigation() {
        let mut store = SessionStore::in_memory();
        store.save_draft(&draft_with_email("a@x.com")).unwrap();

        assert!(!store.on_navigation("page=2").unwrap());
        assert!(store.load_draft().is_some());

        assert!(store.on_navigation("status=success").unwrap());
        assert!(store.load_draft().is_none());
    }

    #[test]
    fn test_clear_all_wipes_every_key() {
        let mut store = SessionStore::in_memory();
        store
            .save_settings(&Settings {
                dark_mode: true,
                ..Default::default()
            })
            .unwrap();
        store.save_draft(&draft_with_email("a@x.com")).unwrap();

        store.clear_all().unwrap();
        assert_eq!(store.load_settings(), Settings::default());
        assert!(store.load_draft().is_none());
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut store = SessionStore::new(Box::new(FileStore::open(&path)));
        store.save_draft(&draft_with_email("b@y.com")).unwrap();
        store
            .save_settings(&Settings {
                animations: false,
                ..Default::default()
            })
            .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"formDraft\""));
        assert!(contents.contains("\"animations\": false"));

        let reopened = SessionStore::new(Box::new(FileStore::open(&path)));
        assert_eq!(
            reopened.load_draft().unwrap().get("email"),
            Some("b@y.com")
        );
        assert!(!reopened.load_settings().animations);
    }

    #[test]
    fn test_malformed_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json").unwrap();

        let store = SessionStore::new(Box::new(FileStore::open(&path)));
        assert_eq!(store.load_settings(), Settings::default());
    }

    #[test]
    fn test_malformed_value_falls_back_to_default() {
        let mut memory = MemoryStore::default();
        memory
            .set(SETTINGS_KEY, Value::String("dark".to_string()))
            .unwrap();
        let store = SessionStore::new(Box::new(memory));
        assert_eq!(store.load_settings(), Settings::default());
    }
}
