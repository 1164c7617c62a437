//! Saved-word commands

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{CommandError, CommandResult};
use crate::vocabulary::{
    IntervalPolicy, SaveRequest, SavedWord, SortOrder, StatusFilter, WordProgressStore,
    WordQuery, WordStatus,
};

/// Answer to a `checkWordExists` request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordLookup {
    pub exists: bool,
    pub word_data: Option<SavedWord>,
}

/// Number of records touched by a bulk operation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Affected {
    pub count: usize,
}

pub(super) fn save_word(
    store: &mut WordProgressStore,
    request: SaveRequest,
    now: DateTime<Utc>,
) -> CommandResult<SavedWord> {
    store.upsert_at(request, now).map_err(Into::into)
}

pub(super) fn check_word_exists(store: &WordProgressStore, word: &str) -> WordLookup {
    let word_data = store.get(word).cloned();
    WordLookup {
        exists: word_data.is_some(),
        word_data,
    }
}

pub(super) fn update_word_progress(
    store: &mut WordProgressStore,
    word: &str,
    policy: Option<IntervalPolicy>,
    now: DateTime<Utc>,
) -> CommandResult<SavedWord> {
    let policy = policy.unwrap_or_default();
    store
        .advance_progress_with(word, policy, now)
        .map_err(Into::into)
}

pub(super) fn update_word_status(
    store: &mut WordProgressStore,
    word: &str,
    status: &str,
    now: DateTime<Utc>,
) -> CommandResult<SavedWord> {
    let status: WordStatus = status.parse().map_err(CommandError::new)?;
    store.set_status_at(word, status, now).map_err(Into::into)
}

pub(super) fn query_words(
    store: &WordProgressStore,
    filter: Option<&str>,
    search: Option<String>,
    sort: Option<SortOrder>,
) -> CommandResult<Vec<SavedWord>> {
    let filter = match filter {
        Some(f) => f.parse::<StatusFilter>().map_err(CommandError::new)?,
        None => StatusFilter::All,
    };
    let query = WordQuery {
        filter,
        search,
        sort: sort.unwrap_or_default(),
    };
    Ok(store.query(&query))
}

pub(super) fn promote_stale(
    store: &mut WordProgressStore,
    progress_days: u32,
    now: DateTime<Utc>,
) -> CommandResult<Affected> {
    let count = store.promote_stale(progress_days, now)?;
    Ok(Affected { count })
}
