//! The persisted `settings` record

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Daily remote translation allowance, also used when a stored limit is zero
pub const DEFAULT_API_CALL_LIMIT: u32 = 5000;

/// Flat configuration record. Every field has a default so partial or older
/// records load cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub original_language: String,
    pub translation_language: String,
    pub auto_translate: bool,
    pub auto_speak: bool,
    pub auto_pause_at_subtitle_end: bool,
    pub use_local_dictionary: bool,
    pub show_control_panel: bool,
    /// Days used to scale review intervals and to promote idle learning words
    #[serde(deserialize_with = "number_or_string")]
    pub word_progress_days: u32,
    /// Successful remote translations today
    pub api_call_count: u32,
    #[serde(deserialize_with = "limit_or_default")]
    pub api_call_limit: u32,
    /// When the daily counter was last reset
    pub api_call_reset_date: DateTime<Utc>,
    pub extension_enabled: bool,
    pub auto_show_subtitle_popup: bool,
    pub use_speech_recognition: bool,
    pub speech_recognition_confidence: f32,
    pub auto_start_speech_recognition: bool,
    pub api_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            original_language: "en".to_string(),
            translation_language: "tr".to_string(),
            auto_translate: true,
            auto_speak: false,
            auto_pause_at_subtitle_end: true,
            use_local_dictionary: false,
            show_control_panel: true,
            word_progress_days: 7,
            api_call_count: 0,
            api_call_limit: DEFAULT_API_CALL_LIMIT,
            api_call_reset_date: Utc::now(),
            extension_enabled: true,
            auto_show_subtitle_popup: true,
            use_speech_recognition: true,
            speech_recognition_confidence: 0.6,
            auto_start_speech_recognition: false,
            api_key: String::new(),
        }
    }
}

impl Settings {
    /// Zero the daily counter if the last reset happened on another local
    /// calendar day. Returns whether a reset happened.
    pub fn reset_usage_if_new_day(&mut self, now: DateTime<Utc>) -> bool {
        let last = self.api_call_reset_date.with_timezone(&Local).date_naive();
        let today = now.with_timezone(&Local).date_naive();
        if last == today {
            return false;
        }
        self.api_call_count = 0;
        self.api_call_reset_date = now;
        true
    }

    pub fn usage_limit_reached(&self) -> bool {
        self.api_call_count >= self.api_call_limit
    }

    pub fn api_status(&self) -> ApiStatus {
        ApiStatus {
            call_count: self.api_call_count,
            daily_limit: self.api_call_limit,
            reset_date: self.api_call_reset_date,
        }
    }
}

/// Daily translation usage as reported to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStatus {
    pub call_count: u32,
    pub daily_limit: u32,
    pub reset_date: DateTime<Utc>,
}

impl ApiStatus {
    pub fn usage_percent(&self) -> u32 {
        if self.daily_limit == 0 {
            return 100;
        }
        ((self.call_count as f64 / self.daily_limit as f64) * 100.0).round() as u32
    }
}

/// Older records store the day count as a string, e.g. `"7"`
fn number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// A zero or null limit means "unset"
fn limit_or_default<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<u32>::deserialize(deserializer)? {
        Some(limit) if limit > 0 => Ok(limit),
        _ => Ok(DEFAULT_API_CALL_LIMIT),
    }
}
