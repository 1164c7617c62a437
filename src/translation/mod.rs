//! Translation lookups with a persistent cache and a daily call limit

mod client;
mod service;

use thiserror::Error;

use crate::storage::StorageError;

pub use client::{MyMemoryClient, Translator, MYMEMORY_ENDPOINT};
pub use service::{
    cache_key, TranslationCache, TranslationOutcome, TranslationService, FAILED_TRANSLATION_TEXT,
};

#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("Nothing to translate")]
    EmptyText,

    #[error("Daily limit reached")]
    DailyLimitReached,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Translation API error ({status}): {details}")]
    Api { status: u64, details: String },

    #[error("No translation found")]
    NoTranslation,

    #[error("Translation service returned an error message: {0}")]
    Rejected(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
