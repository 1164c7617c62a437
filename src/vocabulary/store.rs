//! Saved-word store
//!
//! The whole mapping lives under the `savedWords` key. It is loaded once when
//! the store is opened and written back in full after every mutation. If a
//! write fails, the in-memory mapping stays authoritative and is written again
//! on the next mutation or an explicit [`WordProgressStore::flush`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::*;
use super::query::WordQuery;
use super::schedule::{add_days, IntervalPolicy};
use super::stats::VocabularyStats;
use crate::storage::{get_json, keys, set_json, SharedStore, StorageError};

/// Substrings that mark a translation as an error message rather than a translation
pub const TRANSLATION_ERROR_MARKERS: [&str; 5] = ["Error:", "Error", "WARNING", "Invalid", "hatası"];

/// Days a new word may stay new before it is moved to learning
const STALE_NEW_DAYS: i64 = 30;
/// Views needed before a learning word can be promoted by inactivity
const PROMOTION_MIN_VIEWS: u32 = 5;

#[derive(Error, Debug)]
pub enum VocabularyError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid translation: {0}")]
    InvalidTranslation(String),

    #[error("Word not found: {0}")]
    NotFound(String),

    #[error("Storage failure: {0}")]
    StorageFailure(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, VocabularyError>;

/// Everything captured when the learner saves a word
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub word: String,
    pub translation: String,
    #[serde(default)]
    pub context: Option<WordContext>,
    /// Title of the video the word came from
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub timestamp: Option<SourceTimestamp>,
}

impl SaveRequest {
    pub fn new(word: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            translation: translation.into(),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, text: impl Into<String>, source: impl Into<String>) -> Self {
        self.context = Some(WordContext::new(text, source));
        self
    }

    pub fn with_source(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.source = Some(name.into());
        self.source_url = Some(url.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: SourceTimestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.word.trim().is_empty() {
            return Err(VocabularyError::MissingField("word"));
        }
        if self.translation.trim().is_empty() {
            return Err(VocabularyError::MissingField("translation"));
        }
        if is_error_translation(&self.translation) {
            return Err(VocabularyError::InvalidTranslation(self.translation.clone()));
        }
        Ok(())
    }

    fn word_source(&self, now: DateTime<Utc>) -> Option<WordSource> {
        let name = self.source.as_deref().filter(|s| !s.trim().is_empty())?;
        Some(WordSource {
            name: name.to_string(),
            url: self.source_url.clone().unwrap_or_default(),
            timestamp: self
                .timestamp
                .clone()
                .unwrap_or(SourceTimestamp::At(now)),
        })
    }
}

/// Whether a translation string is actually an error message
pub fn is_error_translation(translation: &str) -> bool {
    TRANSLATION_ERROR_MARKERS
        .iter()
        .any(|marker| translation.contains(marker))
}

/// Owner of the word → record mapping
pub struct WordProgressStore {
    backend: SharedStore,
    words: SavedWords,
    dirty: bool,
}

impl WordProgressStore {
    /// Load the mapping from the backend. A missing key is an empty store.
    pub fn open(backend: SharedStore) -> Result<Self> {
        let words: SavedWords = get_json(backend.as_ref(), keys::SAVED_WORDS)?.unwrap_or_default();
        log::info!("Loaded {} saved words", words.len());

        Ok(Self {
            backend,
            words,
            dirty: false,
        })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether a previous write failed and has not been retried successfully
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn words(&self) -> &SavedWords {
        &self.words
    }

    /// Look up a word. Keys are stored trimmed, so surrounding whitespace is ignored.
    pub fn get(&self, word: &str) -> Option<&SavedWord> {
        self.words.get(word.trim())
    }

    // ==================== Mutations ====================

    /// Save a word, or merge into the existing record
    pub fn upsert(&mut self, request: SaveRequest) -> Result<SavedWord> {
        self.upsert_at(request, Utc::now())
    }

    pub fn upsert_at(&mut self, request: SaveRequest, now: DateTime<Utc>) -> Result<SavedWord> {
        request.validate()?;

        let key = request.word.trim().to_string();
        let context = request.context.clone();
        let source = request.word_source(now);

        let record = match self.words.get_mut(&key) {
            Some(existing) => {
                existing.translation = request.translation.clone();
                existing.review_count = existing.review_count.saturating_add(1);
                existing.last_review_date = now;
                existing.set_progress(existing.learning_progress as i32 + SAVE_PROGRESS_STEP as i32);
                existing.next_review_date = IntervalPolicy::ReviewCountBackoff.next_review(existing, now);

                if let Some(context) = context {
                    existing.push_context(context);
                }
                // Merges only record a source when its url is known
                if let Some(source) = source.filter(|s| !s.url.is_empty()) {
                    existing.push_source(source);
                }

                log::debug!(
                    "Updated '{}': review #{}, progress {}",
                    key,
                    existing.review_count,
                    existing.learning_progress
                );
                existing.clone()
            }
            None => {
                let mut record = SavedWord::new(key.clone(), request.translation.clone(), now);
                if let Some(context) = context {
                    record.push_context(context);
                }
                if let Some(source) = source {
                    record.push_source(source);
                }
                self.words.insert(record.clone());

                log::debug!("Saved new word '{}'", key);
                record
            }
        };

        self.persist()?;
        Ok(record)
    }

    /// Move a word one step forward on the progress-tier schedule
    pub fn advance_progress(&mut self, word: &str) -> Result<SavedWord> {
        self.advance_progress_with(word, IntervalPolicy::default(), Utc::now())
    }

    /// Add 25 progress (capped at 100), re-derive status, and reschedule with `policy`
    pub fn advance_progress_with(
        &mut self,
        word: &str,
        policy: IntervalPolicy,
        now: DateTime<Utc>,
    ) -> Result<SavedWord> {
        let record = self.update(word, |record| {
            record.set_progress(record.learning_progress as i32 + ADVANCE_PROGRESS_STEP as i32);
            record.last_viewed = Some(now);
            record.next_review_date = policy.next_review(record, now);
        })?;
        log::debug!(
            "Advanced '{}' to {} ({})",
            word,
            record.learning_progress,
            record.status.label()
        );
        Ok(record)
    }

    /// Explicit reset back to zero progress
    pub fn reset_progress(&mut self, word: &str) -> Result<SavedWord> {
        self.reset_progress_at(word, Utc::now())
    }

    pub fn reset_progress_at(&mut self, word: &str, now: DateTime<Utc>) -> Result<SavedWord> {
        self.update(word, |record| {
            record.set_progress(0);
            record.next_review_date = add_days(now, 1);
        })
    }

    /// Count a view of the word
    pub fn record_view(&mut self, word: &str) -> Result<SavedWord> {
        self.record_view_at(word, Utc::now())
    }

    pub fn record_view_at(&mut self, word: &str, now: DateTime<Utc>) -> Result<SavedWord> {
        self.update(word, |record| {
            record.view_count = record.view_count.saturating_add(1);
            record.last_viewed = Some(now);
        })
    }

    /// Set the status explicitly. This also counts as a view.
    pub fn set_status(&mut self, word: &str, status: WordStatus) -> Result<SavedWord> {
        self.set_status_at(word, status, Utc::now())
    }

    pub fn set_status_at(
        &mut self,
        word: &str,
        status: WordStatus,
        now: DateTime<Utc>,
    ) -> Result<SavedWord> {
        self.update(word, |record| {
            record.status = status;
            record.view_count = record.view_count.saturating_add(1);
            record.last_viewed = Some(now);
        })
    }

    /// Flip the difficult flag
    pub fn toggle_difficulty(&mut self, word: &str) -> Result<SavedWord> {
        self.update(word, |record| {
            record.difficulty = record.difficulty.toggled();
        })
    }

    pub fn remove(&mut self, word: &str) -> Result<SavedWord> {
        let word = word.trim();
        let removed = self
            .words
            .remove(word)
            .ok_or_else(|| VocabularyError::NotFound(word.to_string()))?;
        log::debug!("Removed '{}'", word);
        self.persist()?;
        Ok(removed)
    }

    pub fn clear_all(&mut self) -> Result<()> {
        let count = self.words.len();
        self.words.clear();
        log::info!("Cleared {} saved words", count);
        self.persist()
    }

    /// Merge imported records. Existing words are replaced in place, new ones
    /// appended. Returns the number of records imported.
    pub fn import(&mut self, imported: SavedWords) -> Result<usize> {
        let count = imported.len();
        for record in imported.iter() {
            self.words.insert(record.clone());
        }
        log::info!("Imported {} words", count);
        self.persist()?;
        Ok(count)
    }

    /// Promote words whose state has gone stale:
    /// - learning words viewed at least 5 times and not viewed for more than
    ///   `progress_days` whole days become learned
    /// - new words added more than 30 days ago become learning
    ///
    /// Returns the number of words changed. Nothing is written if none changed.
    pub fn promote_stale(&mut self, progress_days: u32, now: DateTime<Utc>) -> Result<usize> {
        let mut changed = 0;
        for record in self.words.iter_mut() {
            match record.status {
                WordStatus::Learning => {
                    let idle_days = (now - record.last_activity()).num_days();
                    if record.view_count >= PROMOTION_MIN_VIEWS && idle_days > progress_days as i64 {
                        record.status = WordStatus::Learned;
                        changed += 1;
                    }
                }
                WordStatus::New => {
                    if now - record.date_added > Duration::days(STALE_NEW_DAYS) {
                        record.status = WordStatus::Learning;
                        changed += 1;
                    }
                }
                _ => {}
            }
        }

        if changed > 0 {
            log::info!("Promoted {} stale words", changed);
            self.persist()?;
        }
        Ok(changed)
    }

    /// Retry writing the mapping
    pub fn flush(&mut self) -> Result<()> {
        self.persist()
    }

    // ==================== Queries ====================

    /// Matching records, recomputed on every call
    pub fn query(&self, query: &WordQuery) -> Vec<SavedWord> {
        query.apply(&self.words)
    }

    /// Words due for review, oldest due date first
    pub fn due_words(&self, now: DateTime<Utc>) -> Vec<SavedWord> {
        let mut due: Vec<SavedWord> = self
            .words
            .iter()
            .filter(|w| w.is_due(now))
            .cloned()
            .collect();
        due.sort_by(|a, b| a.next_review_date.cmp(&b.next_review_date));
        due
    }

    pub fn stats(&self, now: DateTime<Utc>) -> VocabularyStats {
        VocabularyStats::collect(&self.words, now)
    }

    // ==================== Internals ====================

    fn update<F>(&mut self, word: &str, apply: F) -> Result<SavedWord>
    where
        F: FnOnce(&mut SavedWord),
    {
        let word = word.trim();
        let record = self
            .words
            .get_mut(word)
            .ok_or_else(|| VocabularyError::NotFound(word.to_string()))?;
        apply(record);
        let updated = record.clone();
        self.persist()?;
        Ok(updated)
    }

    fn persist(&mut self) -> Result<()> {
        match set_json(self.backend.as_ref(), keys::SAVED_WORDS, &self.words) {
            Ok(()) => {
                if self.dirty {
                    log::info!("Saved words written after earlier failure");
                }
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to write saved words, will retry on next change: {}", e);
                self.dirty = true;
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, KeyValueStore, MemoryStore};
    use chrono::TimeZone;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap()
    }

    fn create_test_store() -> (WordProgressStore, Arc<MemoryStore>) {
        let backend = Arc::new(MemoryStore::new());
        let store = WordProgressStore::open(backend.clone()).unwrap();
        (store, backend)
    }

    #[test]
    fn test_first_save() {
        let (mut store, _backend) = create_test_store();
        let record = store.upsert_at(SaveRequest::new("run", "koşmak"), now()).unwrap();

        assert_eq!(record.learning_progress, 10);
        assert_eq!(record.review_count, 1);
        assert_eq!(record.status, WordStatus::New);
        assert_eq!(record.date_added, now());
        assert_eq!(record.last_review_date, now());
        assert_eq!(record.next_review_date, now() + Duration::days(1));
        assert!(record.contexts.is_empty());
        assert!(record.sources.is_empty());
    }

    #[test]
    fn test_second_save_backs_off() {
        let (mut store, _backend) = create_test_store();
        store.upsert_at(SaveRequest::new("run", "koşmak"), now()).unwrap();

        let later = now() + Duration::hours(5);
        let record = store.upsert_at(SaveRequest::new("run", "koşmak"), later).unwrap();

        assert_eq!(record.review_count, 2);
        assert_eq!(record.learning_progress, 20);
        assert_eq!(record.last_review_date, later);
        assert_eq!(record.date_added, now());
        assert_eq!(record.next_review_date, later + Duration::days(2));

        let third = store.upsert_at(SaveRequest::new("run", "koşu"), later).unwrap();
        assert_eq!(third.translation, "koşu");
        assert_eq!(third.learning_progress, 30);
        assert_eq!(third.status, WordStatus::Learning);
        assert_eq!(third.next_review_date, later + Duration::days(4));
    }

    #[test]
    fn test_review_count_matches_saves() {
        let (mut store, _backend) = create_test_store();
        for _ in 0..7 {
            store.upsert_at(SaveRequest::new("look", "bakmak"), now()).unwrap();
        }
        store.upsert_at(SaveRequest::new("see", "görmek"), now()).unwrap();

        let results = store.query(&WordQuery::default().with_search("look"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].review_count, 7);
        assert_eq!(results[0].learning_progress, 70);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_progress_capped_on_save() {
        let (mut store, _backend) = create_test_store();
        for _ in 0..15 {
            store.upsert_at(SaveRequest::new("go", "gitmek"), now()).unwrap();
        }
        assert_eq!(store.get("go").unwrap().learning_progress, 100);
    }

    #[test]
    fn test_rejects_missing_fields() {
        let (mut store, _backend) = create_test_store();
        assert!(matches!(
            store.upsert(SaveRequest::new("", "x")),
            Err(VocabularyError::MissingField("word"))
        ));
        assert!(matches!(
            store.upsert(SaveRequest::new("run", "  ")),
            Err(VocabularyError::MissingField("translation"))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_rejects_error_translations() {
        let (mut store, backend) = create_test_store();
        for bad in ["Error: timeout", "MYMEMORY WARNING: quota", "Invalid language pair", "Çeviri hatası"] {
            let result = store.upsert(SaveRequest::new("run", bad));
            assert!(matches!(result, Err(VocabularyError::InvalidTranslation(_))), "{}", bad);
        }
        assert!(store.get("run").is_none());
        assert!(backend.get_raw(keys::SAVED_WORDS).unwrap().is_none());
    }

    #[test]
    fn test_invalid_translation_leaves_existing_record() {
        let (mut store, _backend) = create_test_store();
        store.upsert_at(SaveRequest::new("run", "koşmak"), now()).unwrap();
        assert!(store.upsert(SaveRequest::new("run", "Error: timeout")).is_err());

        let record = store.get("run").unwrap();
        assert_eq!(record.translation, "koşmak");
        assert_eq!(record.review_count, 1);
    }

    #[test]
    fn test_contexts_and_sources_on_save() {
        let (mut store, _backend) = create_test_store();
        let first = SaveRequest::new("run", "koşmak")
            .with_context("I run every day", "Netflix")
            .with_source("Episode 1", "https://netflix.com/watch/1")
            .with_timestamp(SourceTimestamp::Position(61.0));
        let record = store.upsert_at(first.clone(), now()).unwrap();
        assert_eq!(record.contexts.len(), 1);
        assert_eq!(record.sources.len(), 1);
        assert_eq!(record.sources[0].timestamp, SourceTimestamp::Position(61.0));

        // Same context and url again: nothing grows
        let record = store.upsert_at(first, now()).unwrap();
        assert_eq!(record.contexts.len(), 1);
        assert_eq!(record.sources.len(), 1);

        for i in 2..10 {
            store
                .upsert_at(
                    SaveRequest::new("run", "koşmak")
                        .with_context(format!("line {}", i), "YouTube")
                        .with_source(format!("Episode {}", i), format!("https://netflix.com/watch/{}", i)),
                    now(),
                )
                .unwrap();
        }
        let record = store.get("run").unwrap();
        assert_eq!(record.contexts.len(), MAX_CONTEXTS);
        assert_eq!(record.sources.len(), MAX_SOURCES);
        assert_eq!(record.contexts[0].text, "line 9");
        assert_eq!(record.sources[0].name, "Episode 9");
        assert_eq!(record.sources[0].timestamp, SourceTimestamp::At(now()));
    }

    #[test]
    fn test_merge_ignores_source_without_url() {
        let (mut store, _backend) = create_test_store();
        store.upsert_at(SaveRequest::new("run", "koşmak"), now()).unwrap();

        let mut request = SaveRequest::new("run", "koşmak");
        request.source = Some("Some video".to_string());
        let record = store.upsert_at(request, now()).unwrap();
        assert!(record.sources.is_empty());
    }

    #[test]
    fn test_advance_progress() {
        let (mut store, _backend) = create_test_store();
        store.upsert_at(SaveRequest::new("run", "koşmak"), now()).unwrap();

        let later = now() + Duration::days(3);
        let record = store
            .advance_progress_with("run", IntervalPolicy::ProgressTier, later)
            .unwrap();
        assert_eq!(record.learning_progress, 35);
        assert_eq!(record.status, WordStatus::Learning);
        assert_eq!(record.last_viewed, Some(later));
        assert_eq!(record.next_review_date, later + Duration::days(3));
        // Advancing is not a save
        assert_eq!(record.review_count, 1);

        let record = store
            .advance_progress_with("run", IntervalPolicy::ProgressTier, later)
            .unwrap();
        assert_eq!(record.learning_progress, 60);
        assert_eq!(record.status, WordStatus::Reviewing);
        assert_eq!(record.next_review_date, later + Duration::days(7));
    }

    #[test]
    fn test_advance_is_idempotent_at_ceiling() {
        let (mut store, _backend) = create_test_store();
        store.upsert_at(SaveRequest::new("run", "koşmak"), now()).unwrap();

        for _ in 0..6 {
            let record = store
                .advance_progress_with("run", IntervalPolicy::ProgressTier, now())
                .unwrap();
            assert!(record.learning_progress <= 100);
        }
        let record = store.advance_progress("run").unwrap();
        assert_eq!(record.learning_progress, 100);
        assert_eq!(record.status, WordStatus::Learned);
    }

    #[test]
    fn test_advance_with_scaled_policy() {
        let (mut store, _backend) = create_test_store();
        store.upsert_at(SaveRequest::new("run", "koşmak"), now()).unwrap();
        let policy = IntervalPolicy::ScaledProgressTier { progress_days: 14 };
        let record = store.advance_progress_with("run", policy, now()).unwrap();
        // progress 35 -> base 3 days, doubled
        assert_eq!(record.next_review_date, now() + Duration::days(6));
    }

    #[test]
    fn test_unknown_word_operations() {
        let (mut store, _backend) = create_test_store();
        assert!(matches!(store.remove("nonexistent"), Err(VocabularyError::NotFound(_))));
        assert!(matches!(store.advance_progress("ghost"), Err(VocabularyError::NotFound(_))));
        assert!(matches!(store.record_view("ghost"), Err(VocabularyError::NotFound(_))));
        assert!(matches!(store.toggle_difficulty("ghost"), Err(VocabularyError::NotFound(_))));
    }

    #[test]
    fn test_lookups_ignore_surrounding_whitespace() {
        let (mut store, _backend) = create_test_store();
        let saved = store.upsert_at(SaveRequest::new(" run ", "koşmak"), now()).unwrap();
        assert_eq!(saved.word, "run");

        assert!(store.get("  run").is_some());
        assert_eq!(store.record_view_at(" run", now()).unwrap().view_count, 1);
        assert_eq!(store.advance_progress("run ").unwrap().learning_progress, 35);
        assert_eq!(
            store.toggle_difficulty("\trun").unwrap().difficulty,
            Difficulty::Difficult
        );
        assert_eq!(store.remove(" run ").unwrap().word, "run");
        assert!(store.is_empty());
    }

    #[test]
    fn test_view_status_and_difficulty() {
        let (mut store, _backend) = create_test_store();
        store.upsert_at(SaveRequest::new("run", "koşmak"), now()).unwrap();

        let record = store.record_view_at("run", now()).unwrap();
        assert_eq!(record.view_count, 1);
        assert_eq!(record.review_count, 1);

        let record = store.set_status_at("run", WordStatus::Learned, now()).unwrap();
        assert_eq!(record.status, WordStatus::Learned);
        assert_eq!(record.view_count, 2);
        assert_eq!(record.learning_progress, 10);

        assert_eq!(store.toggle_difficulty("run").unwrap().difficulty, Difficulty::Difficult);
        assert_eq!(store.toggle_difficulty("run").unwrap().difficulty, Difficulty::Normal);
    }

    #[test]
    fn test_reset_progress() {
        let (mut store, _backend) = create_test_store();
        store.upsert_at(SaveRequest::new("run", "koşmak"), now()).unwrap();
        store.advance_progress("run").unwrap();
        store.advance_progress("run").unwrap();

        let record = store.reset_progress_at("run", now()).unwrap();
        assert_eq!(record.learning_progress, 0);
        assert_eq!(record.status, WordStatus::New);
        assert_eq!(record.next_review_date, now() + Duration::days(1));
    }

    #[test]
    fn test_remove_and_clear_all() {
        let (mut store, _backend) = create_test_store();
        store.upsert(SaveRequest::new("run", "koşmak")).unwrap();
        store.upsert(SaveRequest::new("walk", "yürümek")).unwrap();

        let removed = store.remove("run").unwrap();
        assert_eq!(removed.word, "run");
        assert!(store.get("run").is_none());
        assert_eq!(store.len(), 1);

        store.clear_all().unwrap();
        assert!(store.query(&WordQuery::default()).is_empty());
    }

    #[test]
    fn test_persists_and_reloads_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let backend: SharedStore = Arc::new(FileStore::new(temp_dir.path().to_path_buf()));

        {
            let mut store = WordProgressStore::open(backend.clone()).unwrap();
            store.upsert_at(SaveRequest::new("zebra", "zebra"), now()).unwrap();
            store.upsert_at(SaveRequest::new("apple", "elma"), now()).unwrap();
            store.upsert_at(SaveRequest::new("mango", "mango"), now()).unwrap();
            store.toggle_difficulty("apple").unwrap();
        }

        let store = WordProgressStore::open(backend).unwrap();
        let order: Vec<&str> = store.words().iter().map(|w| w.word.as_str()).collect();
        assert_eq!(order, vec!["zebra", "apple", "mango"]);
        assert_eq!(store.get("apple").unwrap().difficulty, Difficulty::Difficult);
    }

    #[test]
    fn test_opens_with_damaged_records() {
        let backend = Arc::new(MemoryStore::new());
        backend
            .set_raw(
                keys::SAVED_WORDS,
                r#"{
                    "run": {
                        "word": "run",
                        "translation": "koşmak",
                        "learningProgress": 30,
                        "dateAdded": "2024-03-01T12:00:00.000Z",
                        "lastReviewDate": "2024-03-01T12:00:00.000Z",
                        "nextReviewDate": "2024-03-01T12:00:00.000Z86400000"
                    },
                    "broken": {"word": "broken", "translation": 7}
                }"#,
            )
            .unwrap();

        let mut store = WordProgressStore::open(backend.clone()).unwrap();
        assert_eq!(store.len(), 1);
        let run = store.get("run").unwrap();
        assert_eq!(run.next_review_date, Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap());
        assert!(run.is_due(now()));

        store.clear_all().unwrap();
        assert_eq!(backend.get_raw(keys::SAVED_WORDS).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_failed_write_is_retried_on_next_change() {
        let (mut store, backend) = create_test_store();
        store.upsert_at(SaveRequest::new("run", "koşmak"), now()).unwrap();

        backend.set_fail_writes(true);
        let result = store.upsert_at(SaveRequest::new("walk", "yürümek"), now());
        assert!(matches!(result, Err(VocabularyError::StorageFailure(_))));
        assert!(store.is_dirty());
        // The change is kept in memory
        assert!(store.get("walk").is_some());

        backend.set_fail_writes(false);
        store.upsert_at(SaveRequest::new("swim", "yüzmek"), now()).unwrap();
        assert!(!store.is_dirty());

        let reopened = WordProgressStore::open(backend).unwrap();
        assert!(reopened.get("walk").is_some());
        assert!(reopened.get("swim").is_some());
    }

    #[test]
    fn test_flush_retries() {
        let (mut store, backend) = create_test_store();
        backend.set_fail_writes(true);
        assert!(store.upsert_at(SaveRequest::new("run", "koşmak"), now()).is_err());

        backend.set_fail_writes(false);
        store.flush().unwrap();
        let reopened = WordProgressStore::open(backend).unwrap();
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn test_due_words() {
        let (mut store, _backend) = create_test_store();
        store.upsert_at(SaveRequest::new("old", "eski"), now() - Duration::days(10)).unwrap();
        store.upsert_at(SaveRequest::new("older", "daha eski"), now() - Duration::days(20)).unwrap();
        store.upsert_at(SaveRequest::new("fresh", "taze"), now()).unwrap();

        let due: Vec<String> = store.due_words(now()).into_iter().map(|w| w.word).collect();
        assert_eq!(due, vec!["older", "old"]);
    }

    #[test]
    fn test_promote_stale() {
        let (mut store, _backend) = create_test_store();
        store.upsert_at(SaveRequest::new("ancient", "kadim"), now() - Duration::days(31)).unwrap();
        store.upsert_at(SaveRequest::new("recent", "yeni"), now() - Duration::days(3)).unwrap();
        store.upsert_at(SaveRequest::new("studied", "çalışılmış"), now() - Duration::days(40)).unwrap();
        store.set_status_at("studied", WordStatus::Learning, now() - Duration::days(12)).unwrap();
        for _ in 0..4 {
            store.record_view_at("studied", now() - Duration::days(10)).unwrap();
        }

        let changed = store.promote_stale(7, now()).unwrap();
        assert_eq!(changed, 2);
        assert_eq!(store.get("ancient").unwrap().status, WordStatus::Learning);
        assert_eq!(store.get("recent").unwrap().status, WordStatus::New);
        assert_eq!(store.get("studied").unwrap().status, WordStatus::Learned);

        assert_eq!(store.promote_stale(7, now()).unwrap(), 0);
    }

    #[test]
    fn test_import_merges() {
        let (mut store, _backend) = create_test_store();
        store.upsert_at(SaveRequest::new("run", "koşmak"), now()).unwrap();
        store.upsert_at(SaveRequest::new("walk", "yürümek"), now()).unwrap();

        let mut replacement = SavedWord::new("run".to_string(), "koşu".to_string(), now());
        replacement.set_progress(90);
        let imported: SavedWords = vec![
            replacement,
            SavedWord::new("swim".to_string(), "yüzmek".to_string(), now()),
        ]
        .into_iter()
        .collect();

        assert_eq!(store.import(imported).unwrap(), 2);
        let order: Vec<&str> = store.words().iter().map(|w| w.word.as_str()).collect();
        assert_eq!(order, vec!["run", "walk", "swim"]);
        assert_eq!(store.get("run").unwrap().translation, "koşu");
    }

    #[test]
    fn test_stats_through_store() {
        let (mut store, _backend) = create_test_store();
        store.upsert_at(SaveRequest::new("run", "koşmak"), now()).unwrap();
        store.upsert_at(SaveRequest::new("walk", "yürümek"), now()).unwrap();
        store.toggle_difficulty("walk").unwrap();

        let stats = store.stats(now());
        assert_eq!(stats.total_words, 2);
        assert_eq!(stats.new_words, 2);
        assert_eq!(stats.difficult_words, 1);
    }
}
