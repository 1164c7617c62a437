//! Export and import commands

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::CommandResult;
use super::words::Affected;
use crate::export::{default_file_name, export_words, parse_import, ExportFormat};
use crate::vocabulary::{SavedWord, WordProgressStore};

/// A rendered export, ready to be written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedFile {
    pub file_name: String,
    pub format: ExportFormat,
    pub content: String,
}

pub(super) fn export(
    store: &WordProgressStore,
    format: ExportFormat,
    now: DateTime<Utc>,
) -> CommandResult<ExportedFile> {
    let words: Vec<SavedWord> = store.words().iter().cloned().collect();
    let content = export_words(&words, format, now)?;
    log::info!("Exported {} words as {}", words.len(), format);
    Ok(ExportedFile {
        file_name: default_file_name(format, now),
        format,
        content,
    })
}

pub(super) fn import(store: &mut WordProgressStore, content: &str) -> CommandResult<Affected> {
    let words = parse_import(content)?;
    let count = store.import(words)?;
    Ok(Affected { count })
}
