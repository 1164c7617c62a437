//! Summary counts over the saved words

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::models::{Difficulty, SavedWord, WordStatus};

/// Statistics for the whole vocabulary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyStats {
    pub total_words: usize,
    pub new_words: usize,
    pub learning_words: usize,
    pub reviewing_words: usize,
    pub learned_words: usize,
    pub difficult_words: usize,
    pub due_words: usize,
    /// Added in the last 7 days
    pub added_this_week: usize,
    /// Last viewed (or added) since the first of the current month
    pub viewed_this_month: usize,
    /// Last viewed (or added) within the last 7 days
    pub active_last_week: usize,
}

impl VocabularyStats {
    pub fn collect<'a, I>(words: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a SavedWord>,
    {
        let week_ago = now - Duration::days(7);
        let month_start = Utc
            .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
            .single()
            .unwrap_or(now);

        let mut stats = Self::default();
        for word in words {
            stats.total_words += 1;
            match word.status {
                WordStatus::New => stats.new_words += 1,
                WordStatus::Learning => stats.learning_words += 1,
                WordStatus::Reviewing => stats.reviewing_words += 1,
                WordStatus::Learned => stats.learned_words += 1,
            }
            if word.difficulty == Difficulty::Difficult {
                stats.difficult_words += 1;
            }
            if word.is_due(now) {
                stats.due_words += 1;
            }
            if word.date_added >= week_ago {
                stats.added_this_week += 1;
            }

            let activity = word.last_activity();
            if activity >= month_start && activity <= now {
                stats.viewed_this_month += 1;
            }
            if activity >= week_ago {
                stats.active_last_week += 1;
            }
        }
        stats
    }

    /// Share of words in `status`, as a whole percentage
    pub fn percentage(&self, status: WordStatus) -> u32 {
        if self.total_words == 0 {
            return 0;
        }
        let count = match status {
            WordStatus::New => self.new_words,
            WordStatus::Learning => self.learning_words,
            WordStatus::Reviewing => self.reviewing_words,
            WordStatus::Learned => self.learned_words,
        };
        ((count as f64 / self.total_words as f64) * 100.0).round() as u32
    }
}
