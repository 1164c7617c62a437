use serde::Serialize;
use thiserror::Error;

use crate::export::ExportError;
use crate::storage::StorageError;
use crate::translation::TranslationError;
use crate::vocabulary::VocabularyError;

/// Error surfaced to the presentation layer as a plain message
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct CommandError {
    pub message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<VocabularyError> for CommandError {
    fn from(err: VocabularyError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<StorageError> for CommandError {
    fn from(err: StorageError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<TranslationError> for CommandError {
    fn from(err: TranslationError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<ExportError> for CommandError {
    fn from(err: ExportError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Invalid request: {}", err))
    }
}

pub type CommandResult<T> = Result<T, CommandError>;
