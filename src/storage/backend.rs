//! Key-value persistence seam
//!
//! Every piece of persisted state lives under one string key whose value is a
//! JSON document. Implementations only move raw JSON text; typed access goes
//! through [`get_json`] and [`set_json`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Keys used by the application
pub mod keys {
    pub const SETTINGS: &str = "settings";
    pub const SAVED_WORDS: &str = "savedWords";
    pub const TRANSLATION_CACHE: &str = "translationCache";
    pub const SUBTITLE_POPUP_POSITION: &str = "subtitlePopupPosition";
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Raw key-value persistence backend
pub trait KeyValueStore: Send + Sync {
    /// Read the JSON text stored under `key`, if any
    fn get_raw(&self, key: &str) -> Result<Option<String>>;

    /// Replace the JSON text stored under `key`
    fn set_raw(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Backend handle shared by the store, settings, and translation service
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Read and deserialize the value under `key`
pub fn get_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get_raw(key)? {
        Some(content) => Ok(Some(serde_json::from_str(&content)?)),
        None => Ok(None),
    }
}

/// Serialize and write `value` under `key`
pub fn set_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    store.set_raw(key, &content)
}

/// Keys become file names, so keep them to a safe alphabet
pub(crate) fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
