//! Cached, rate-limited translation

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::client::Translator;
use super::TranslationError;
use crate::settings::SettingsStore;
use crate::storage::{get_json, keys, set_json, SharedStore};
use crate::vocabulary::is_error_translation;

/// Text shown in place of a translation when the lookup failed
pub const FAILED_TRANSLATION_TEXT: &str = "Çeviri hatası";

/// Last translation per `"text|from|to"` key
pub type TranslationCache = BTreeMap<String, String>;

pub fn cache_key(text: &str, from: &str, to: &str) -> String {
    format!("{}|{}|{}", text, from, to)
}

/// Structured translation result handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationOutcome {
    pub success: bool,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct TranslationService {
    translator: Box<dyn Translator>,
    backend: SharedStore,
    settings: SettingsStore,
}

impl TranslationService {
    pub fn new(translator: Box<dyn Translator>, backend: SharedStore) -> Self {
        let settings = SettingsStore::new(backend.clone());
        Self {
            translator,
            backend,
            settings,
        }
    }

    pub fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslationError> {
        self.translate_at(text, from, to, Utc::now())
    }

    pub fn translate_at(
        &self,
        text: &str,
        from: &str,
        to: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TranslationError> {
        if text.trim().is_empty() {
            return Err(TranslationError::EmptyText);
        }
        // Single characters are not worth a lookup
        if text.trim().chars().count() < 2 {
            return Ok(text.trim().to_string());
        }

        let key = cache_key(text, from, to);
        let mut cache = self.load_cache();
        if let Some(hit) = cache.get(&key) {
            log::debug!("Translation cache hit for {:?}", key);
            return Ok(hit.clone());
        }

        let mut settings = self.settings.load()?;
        if settings.reset_usage_if_new_day(now) {
            log::info!("Daily translation counter reset");
            if let Err(e) = self.settings.save(&settings) {
                log::warn!("Failed to save counter reset: {}", e);
            }
        }
        if settings.usage_limit_reached() {
            log::warn!(
                "Daily translation limit reached ({}/{})",
                settings.api_call_count,
                settings.api_call_limit
            );
            return Err(TranslationError::DailyLimitReached);
        }

        let translation = self.translator.translate(text, from, to).map_err(|e| {
            log::warn!("Translation of {:?} failed: {}", text, e);
            e
        })?;
        if is_error_translation(&translation) {
            return Err(TranslationError::Rejected(translation));
        }

        cache.insert(key, translation.clone());
        if let Err(e) = set_json(self.backend.as_ref(), keys::TRANSLATION_CACHE, &cache) {
            log::warn!("Failed to save translation cache: {}", e);
        }

        settings.api_call_count = settings.api_call_count.saturating_add(1);
        if let Err(e) = self.settings.save(&settings) {
            log::warn!("Failed to save translation counter: {}", e);
        }

        Ok(translation)
    }

    /// Like [`translate`](Self::translate), folded into a `{success, translation, error}` result
    pub fn translate_outcome(&self, text: &str, from: &str, to: &str) -> TranslationOutcome {
        match self.translate(text, from, to) {
            Ok(translation) => TranslationOutcome {
                success: true,
                translation,
                error: None,
            },
            Err(e) => TranslationOutcome {
                success: false,
                translation: FAILED_TRANSLATION_TEXT.to_string(),
                error: Some(e.to_string()),
            },
        }
    }

    /// Drop every cached translation
    pub fn clear_cache(&self) -> Result<(), TranslationError> {
        self.backend.remove(keys::TRANSLATION_CACHE)?;
        Ok(())
    }

    fn load_cache(&self) -> TranslationCache {
        match get_json(self.backend.as_ref(), keys::TRANSLATION_CACHE) {
            Ok(cache) => cache.unwrap_or_default(),
            Err(e) => {
                log::warn!("Ignoring unreadable translation cache: {}", e);
                TranslationCache::new()
            }
        }
    }
}
