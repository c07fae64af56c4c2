//! Customization settings persisted in a key-value store.
//!
//! Settings are stored as one JSON document under [`SETTINGS_KEY`]. Absent
//! or unparsable data loads as [`CustomizationSettings::default`]. The store
//! is injected, so there is no process-wide singleton.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Fixed key under which the settings document is stored.
pub const SETTINGS_KEY: &str = "vitrine.customization";

/// Branding applied to the admin interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomizationSettings {
    pub brand_name: String,
    pub primary_color: String,
    pub accent_color: String,
    pub logo_url: Option<String>,
    pub dark_mode: bool,
}

impl Default for CustomizationSettings {
    fn default() -> Self {
        Self {
            brand_name: "Vitrine".to_string(),
            primary_color: "#16a34a".to_string(),
            accent_color: "#facc15".to_string(),
            logo_url: None,
            dark_mode: true,
        }
    }
}

/// Errors from a [`KeyValueStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// String key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Volatile store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object on disk (`{ key: value, ... }`).
///
/// Every write rewrites the whole file; the expected volume is a handful of
/// keys.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(HashMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Entries to rewrite on `set`/`remove`, and whether the file has to be
    /// replaced because it does not parse.
    fn read_for_write(&self) -> Result<(HashMap<String, String>, bool), StoreError> {
        match self.read_all() {
            Ok(entries) => Ok((entries, false)),
            Err(StoreError::Serialization(e)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Settings file is unparsable, overwriting",
                );
                Ok((HashMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let (mut entries, _) = self.read_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let (mut entries, corrupt) = self.read_for_write()?;
        if entries.remove(key).is_some() || corrupt {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Load/save/reset lifecycle for [`CustomizationSettings`].
pub struct SettingsManager<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SettingsManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current settings, or defaults when nothing usable is stored.
    pub fn load(&self) -> CustomizationSettings {
        let raw = match self.store.get(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CustomizationSettings::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read settings, using defaults");
                return CustomizationSettings::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Stored settings are unparsable, using defaults");
            CustomizationSettings::default()
        })
    }

    pub fn save(&self, settings: &CustomizationSettings) -> Result<(), StoreError> {
        let raw = serde_json::to_string(settings)?;
        self.store.set(SETTINGS_KEY, &raw)
    }

    /// Drop stored settings and return the defaults.
    pub fn reset(&self) -> Result<CustomizationSettings, StoreError> {
        self.store.remove(SETTINGS_KEY)?;
        Ok(CustomizationSettings::default())
    }
}
