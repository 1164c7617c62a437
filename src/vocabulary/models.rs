//! Data models for saved vocabulary

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::schedule::add_days;

/// Progress given to a word the first time it is saved
pub const INITIAL_PROGRESS: u8 = 10;
/// Progress added each time an existing word is saved again
pub const SAVE_PROGRESS_STEP: u8 = 10;
/// Progress added by an explicit "advance" click
pub const ADVANCE_PROGRESS_STEP: u8 = 25;
pub const MAX_PROGRESS: u8 = 100;

pub const MAX_CONTEXTS: usize = 5;
pub const MAX_SOURCES: usize = 5;

/// Learning state of a saved word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordStatus {
    /// Progress below 25
    New,
    /// Progress 25 to 49
    Learning,
    /// Progress 50 to 74
    Reviewing,
    /// Progress 75 and above
    Learned,
}

impl Default for WordStatus {
    fn default() -> Self {
        Self::New
    }
}

impl WordStatus {
    pub const ALL: [WordStatus; 4] = [
        WordStatus::New,
        WordStatus::Learning,
        WordStatus::Reviewing,
        WordStatus::Learned,
    ];

    /// Classify a progress value
    pub fn from_progress(progress: u8) -> Self {
        match progress {
            0..=24 => Self::New,
            25..=49 => Self::Learning,
            50..=74 => Self::Reviewing,
            _ => Self::Learned,
        }
    }

    /// Display label shown to the learner
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "Yeni",
            Self::Learning => "Öğreniliyor",
            Self::Reviewing => "Tekrarlama",
            Self::Learned => "Öğrenildi",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Reviewing => "reviewing",
            Self::Learned => "learned",
        }
    }
}

impl fmt::Display for WordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(Self::New),
            "learning" => Ok(Self::Learning),
            "reviewing" => Ok(Self::Reviewing),
            "learned" => Ok(Self::Learned),
            other => Err(format!(
                "unknown status '{}' (expected new, learning, reviewing, learned)",
                other
            )),
        }
    }
}

/// User-toggled difficulty flag, independent of progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Normal,
    Difficult,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Normal
    }
}

impl Difficulty {
    pub fn toggled(self) -> Self {
        match self {
            Self::Normal => Self::Difficult,
            Self::Difficult => Self::Normal,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Difficult => "Zor",
        }
    }
}

/// An example sentence the word was captured from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordContext {
    pub text: String,
    /// Where the sentence came from, e.g. "Netflix" or "YouTube"
    #[serde(default)]
    pub source: String,
}

impl WordContext {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }
}

/// When a word was seen in a source video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceTimestamp {
    /// Playback position in seconds
    Position(f64),
    /// Wall-clock capture time
    At(DateTime<Utc>),
}

/// The video a word was captured from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSource {
    pub name: String,
    #[serde(default)]
    pub url: String,
    pub timestamp: SourceTimestamp,
}

/// A saved vocabulary item and its learning metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredWord")]
pub struct SavedWord {
    pub word: String,
    pub translation: String,
    pub learning_progress: u8,
    pub status: WordStatus,
    pub date_added: DateTime<Utc>,
    pub last_review_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_viewed: Option<DateTime<Utc>>,
    pub next_review_date: DateTime<Utc>,
    pub review_count: u32,
    pub view_count: u32,
    pub contexts: Vec<WordContext>,
    pub sources: Vec<WordSource>,
    pub difficulty: Difficulty,
}

/// Stored form of a [`SavedWord`]. Older records have no review dates, and
/// some carry dates that do not parse; both are filled in from `dateAdded`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredWord {
    #[serde(default)]
    word: String,
    translation: String,
    #[serde(default)]
    learning_progress: u8,
    #[serde(default)]
    status: WordStatus,
    #[serde(default, alias = "createdAt", deserialize_with = "lenient_date")]
    date_added: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_date")]
    last_review_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_date")]
    last_viewed: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_date")]
    next_review_date: Option<DateTime<Utc>>,
    #[serde(default)]
    review_count: u32,
    #[serde(default)]
    view_count: u32,
    #[serde(default)]
    contexts: Vec<WordContext>,
    #[serde(default)]
    sources: Vec<WordSource>,
    #[serde(default)]
    difficulty: Difficulty,
}

impl TryFrom<StoredWord> for SavedWord {
    type Error = String;

    fn try_from(stored: StoredWord) -> Result<Self, Self::Error> {
        let date_added = stored
            .date_added
            .or(stored.last_review_date)
            .ok_or_else(|| "missing or invalid dateAdded".to_string())?;
        let last_review_date = stored.last_review_date.unwrap_or(date_added);
        let next_review_date = stored
            .next_review_date
            .unwrap_or_else(|| add_days(last_review_date, 1));

        Ok(Self {
            word: stored.word,
            translation: stored.translation,
            learning_progress: stored.learning_progress,
            status: stored.status,
            date_added,
            last_review_date,
            last_viewed: stored.last_viewed,
            next_review_date,
            review_count: stored.review_count,
            view_count: stored.view_count,
            contexts: stored.contexts,
            sources: stored.sources,
            difficulty: stored.difficulty,
        })
    }
}

/// RFC 3339 text or epoch milliseconds. Anything else reads as absent.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => DateTime::parse_from_rfc3339(text.trim())
            .ok()
            .map(|date| date.with_timezone(&Utc)),
        Value::Number(millis) => millis.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    })
}

impl SavedWord {
    /// A freshly saved word, due for review one day later
    pub fn new(word: String, translation: String, now: DateTime<Utc>) -> Self {
        Self {
            word,
            translation,
            learning_progress: INITIAL_PROGRESS,
            status: WordStatus::from_progress(INITIAL_PROGRESS),
            date_added: now,
            last_review_date: now,
            last_viewed: None,
            next_review_date: add_days(now, 1),
            review_count: 1,
            view_count: 0,
            contexts: Vec::new(),
            sources: Vec::new(),
            difficulty: Difficulty::default(),
        }
    }

    /// Set progress (clamped to 0..=100) and re-derive the status
    pub fn set_progress(&mut self, progress: i32) {
        self.learning_progress = progress.clamp(0, MAX_PROGRESS as i32) as u8;
        self.status = WordStatus::from_progress(self.learning_progress);
    }

    /// Front-push a context unless its text is empty or it is already present.
    /// Returns whether the list changed.
    pub fn push_context(&mut self, context: WordContext) -> bool {
        if context.text.trim().is_empty() || self.contexts.contains(&context) {
            return false;
        }
        self.contexts.insert(0, context);
        self.contexts.truncate(MAX_CONTEXTS);
        true
    }

    /// Front-push a source unless one with the same url is already present.
    /// Returns whether the list changed.
    pub fn push_source(&mut self, source: WordSource) -> bool {
        if self.sources.iter().any(|s| s.url == source.url) {
            return false;
        }
        self.sources.insert(0, source);
        self.sources.truncate(MAX_SOURCES);
        true
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_date <= now
    }

    /// Last time the learner looked at the word, falling back to when it was added
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_viewed.unwrap_or(self.date_added)
    }

    /// Repair values that may come from older or hand-edited data
    pub(crate) fn normalize(&mut self) {
        self.learning_progress = self.learning_progress.min(MAX_PROGRESS);
        self.contexts.truncate(MAX_CONTEXTS);
        self.sources.truncate(MAX_SOURCES);
    }
}

/// Insertion-ordered mapping from word to record.
///
/// Persisted as a JSON object keyed by word. A JSON array of records is also
/// accepted on input; either way the document order is the insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedWords {
    entries: Vec<SavedWord>,
    index: HashMap<String, usize>,
}

impl SavedWords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn get(&self, word: &str) -> Option<&SavedWord> {
        self.index.get(word).map(|&i| &self.entries[i])
    }

    pub fn get_mut(&mut self, word: &str) -> Option<&mut SavedWord> {
        match self.index.get(word) {
            Some(&i) => Some(&mut self.entries[i]),
            None => None,
        }
    }

    /// Insert or replace. A replaced record keeps its original position.
    pub fn insert(&mut self, record: SavedWord) {
        match self.index.get(&record.word) {
            Some(&i) => self.entries[i] = record,
            None => {
                self.index.insert(record.word.clone(), self.entries.len());
                self.entries.push(record);
            }
        }
    }

    pub fn remove(&mut self, word: &str) -> Option<SavedWord> {
        let position = self.index.remove(word)?;
        let removed = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Records in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, SavedWord> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, SavedWord> {
        self.entries.iter_mut()
    }
}

impl<'a> IntoIterator for &'a SavedWords {
    type Item = &'a SavedWord;
    type IntoIter = std::slice::Iter<'a, SavedWord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<SavedWord> for SavedWords {
    fn from_iter<I: IntoIterator<Item = SavedWord>>(iter: I) -> Self {
        let mut words = SavedWords::new();
        for record in iter {
            words.insert(record);
        }
        words
    }
}

impl Serialize for SavedWords {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for record in &self.entries {
            map.serialize_entry(&record.word, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SavedWords {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SavedWordsVisitor)
    }
}

struct SavedWordsVisitor;

impl<'de> Visitor<'de> for SavedWordsVisitor {
    type Value = SavedWords;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of word to record, or a list of records")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut words = SavedWords::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            match serde_json::from_value::<SavedWord>(value) {
                Ok(mut record) => {
                    if record.word.is_empty() {
                        record.word = key;
                    }
                    record.normalize();
                    words.insert(record);
                }
                Err(e) => log::warn!("Skipping unreadable saved word '{}': {}", key, e),
            }
        }
        Ok(words)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut words = SavedWords::new();
        let mut position = 0;
        while let Some(value) = access.next_element::<Value>()? {
            match serde_json::from_value::<SavedWord>(value) {
                Ok(mut record) if !record.word.is_empty() => {
                    record.normalize();
                    words.insert(record);
                }
                Ok(_) => log::warn!("Skipping saved word #{} without a word", position),
                Err(e) => log::warn!("Skipping unreadable saved word #{}: {}", position, e),
            }
            position += 1;
        }
        Ok(words)
    }
}
