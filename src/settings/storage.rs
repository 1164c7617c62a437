//! Settings persistence

use serde_json::Value;

use super::models::Settings;
use crate::storage::{get_json, keys, set_json, Result, SharedStore, StorageError};

pub struct SettingsStore {
    backend: SharedStore,
}

impl SettingsStore {
    pub fn new(backend: SharedStore) -> Self {
        Self { backend }
    }

    /// Load settings, falling back to defaults when none are stored
    pub fn load(&self) -> Result<Settings> {
        Ok(get_json(self.backend.as_ref(), keys::SETTINGS)?.unwrap_or_default())
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        set_json(self.backend.as_ref(), keys::SETTINGS, settings)
    }

    /// Overlay a partial settings object on the stored settings and save the result
    pub fn merge(&self, patch: Value) -> Result<Settings> {
        let Value::Object(patch) = patch else {
            return Err(StorageError::Json(serde::de::Error::custom(
                "settings update must be a JSON object",
            )));
        };

        let mut current = match serde_json::to_value(self.load()?)? {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        for (key, value) in patch {
            current.insert(key, value);
        }

        let merged: Settings = serde_json::from_value(Value::Object(current))?;
        self.save(&merged)?;
        log::info!("Settings updated");
        Ok(merged)
    }
}
