//! Export and import of saved words

mod json;
mod tabular;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::vocabulary::SavedWord;

pub use json::{export_json, parse_import, ExportDocument};
pub use tabular::{export_csv, export_csv_in, CSV_HEADER};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No words to export")]
    NothingToExport,

    #[error("Import contains no words")]
    EmptyImport,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Render words in the given format. An empty list is an error.
pub fn export_words(words: &[SavedWord], format: ExportFormat, now: DateTime<Utc>) -> Result<String> {
    if words.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    match format {
        ExportFormat::Json => export_json(words, now),
        ExportFormat::Csv => export_csv(words),
    }
}

/// Suggested file name, e.g. `language-learner-words-2024-05-01.csv`
pub fn default_file_name(format: ExportFormat, now: DateTime<Utc>) -> String {
    format!("language-learner-words-{}.{}", now.format("%Y-%m-%d"), format.extension())
}
