use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ExportError, Result};
use crate::vocabulary::{SavedWord, SavedWords};

/// Envelope written by a JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub export_date: DateTime<Utc>,
    pub words: Vec<SavedWord>,
}

pub fn export_json(words: &[SavedWord], now: DateTime<Utc>) -> Result<String> {
    let document = ExportDocument {
        export_date: now,
        words: words.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

#[derive(Deserialize)]
struct ImportEnvelope {
    words: SavedWords,
}

/// An export envelope carries its records under `words`. A saved word named
/// "words" holds a record object, not a list.
fn is_envelope(document: &Value) -> bool {
    match document.get("words") {
        Some(Value::Array(_)) => true,
        Some(Value::Object(_)) => document.get("exportDate").is_some(),
        _ => false,
    }
}

/// Parse an import file: an export envelope, a word-keyed object, or an array
/// of records. Records that cannot be read are skipped.
pub fn parse_import(text: &str) -> Result<SavedWords> {
    // Classify on a `Value`, then parse the text again so key order survives
    let document: Value = serde_json::from_str(text)?;
    let words = if is_envelope(&document) {
        serde_json::from_str::<ImportEnvelope>(text)?.words
    } else {
        serde_json::from_str::<SavedWords>(text)?
    };
    if words.is_empty() {
        return Err(ExportError::EmptyImport);
    }
    log::debug!("Parsed {} words for import", words.len());
    Ok(words)
}
