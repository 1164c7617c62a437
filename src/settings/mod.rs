//! User settings and daily translation usage

mod models;
mod storage;

pub use models::*;
pub use storage::SettingsStore;
