//! Persistence backend for settings, saved words, and the translation cache

mod backend;
mod file_store;
mod memory;

pub use backend::{get_json, keys, set_json, KeyValueStore, Result, SharedStore, StorageError};
pub use file_store::{FileStore, DATA_DIR_ENV};
pub use memory::MemoryStore;
