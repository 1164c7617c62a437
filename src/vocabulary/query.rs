//! Filtering and ordering of saved words

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::models::{Difficulty, SavedWord, WordStatus};

/// Which words a listing includes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusFilter {
    #[default]
    All,
    Status(WordStatus),
    Difficult,
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "difficult" => Ok(Self::Difficult),
            other => other
                .parse::<WordStatus>()
                .map(Self::Status)
                .map_err(|_| format!("unknown filter '{}'", other)),
        }
    }
}

/// Listing order. Every order is stable: ties keep insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Case-insensitive by word
    Alphabetical,
    /// Newest first
    #[default]
    RecentlyAdded,
    /// Most recently viewed first, unviewed words by their add date
    RecentlyViewed,
    LeastViewed,
    MostViewed,
    /// Highest progress first
    Progress,
    /// Soonest review first
    NextReview,
}

impl SortOrder {
    pub const ALL: [SortOrder; 7] = [
        SortOrder::Alphabetical,
        SortOrder::RecentlyAdded,
        SortOrder::RecentlyViewed,
        SortOrder::LeastViewed,
        SortOrder::MostViewed,
        SortOrder::Progress,
        SortOrder::NextReview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alphabetical => "alphabetical",
            Self::RecentlyAdded => "recently-added",
            Self::RecentlyViewed => "recently-viewed",
            Self::LeastViewed => "least-viewed",
            Self::MostViewed => "most-viewed",
            Self::Progress => "progress",
            Self::NextReview => "next-review",
        }
    }

    fn compare(&self, a: &SavedWord, b: &SavedWord) -> Ordering {
        match self {
            Self::Alphabetical => a.word.to_lowercase().cmp(&b.word.to_lowercase()),
            Self::RecentlyAdded => b.date_added.cmp(&a.date_added),
            Self::RecentlyViewed => b.last_activity().cmp(&a.last_activity()),
            Self::LeastViewed => a.view_count.cmp(&b.view_count),
            Self::MostViewed => b.view_count.cmp(&a.view_count),
            Self::Progress => b.learning_progress.cmp(&a.learning_progress),
            Self::NextReview => a.next_review_date.cmp(&b.next_review_date),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        if wanted == "recent" {
            return Ok(Self::RecentlyAdded);
        }
        Self::ALL
            .into_iter()
            .find(|order| order.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|o| o.as_str()).collect();
                format!("unknown sort '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

/// Filter, search text, and order for a listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordQuery {
    #[serde(default)]
    pub filter: StatusFilter,
    /// Case-insensitive substring over word and translation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
}

impl WordQuery {
    pub fn new(filter: StatusFilter, sort: SortOrder) -> Self {
        Self {
            filter,
            search: None,
            sort,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn matches(&self, word: &SavedWord) -> bool {
        let passes_filter = match self.filter {
            StatusFilter::All => true,
            StatusFilter::Status(status) => word.status == status,
            StatusFilter::Difficult => word.difficulty == Difficulty::Difficult,
        };
        if !passes_filter {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                word.word.to_lowercase().contains(&term)
                    || word.translation.to_lowercase().contains(&term)
            }
        }
    }

    /// Matching records in this query's order. `words` must be in insertion order.
    pub fn apply<'a, I>(&self, words: I) -> Vec<SavedWord>
    where
        I: IntoIterator<Item = &'a SavedWord>,
    {
        let mut result: Vec<SavedWord> = words
            .into_iter()
            .filter(|w| self.matches(w))
            .cloned()
            .collect();
        result.sort_by(|a, b| self.sort.compare(a, b));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn word(name: &str, translation: &str, added_day: i64) -> SavedWord {
        SavedWord::new(
            name.to_string(),
            translation.to_string(),
            base() + Duration::days(added_day),
        )
    }

    fn sample() -> Vec<SavedWord> {
        let mut apple = word("Apple", "elma", 0);
        apple.view_count = 3;
        apple.set_progress(80);
        apple.last_viewed = Some(base() + Duration::days(9));

        let mut run = word("run", "koşmak", 2);
        run.view_count = 1;
        run.set_progress(30);
        run.difficulty = Difficulty::Difficult;

        let mut bread = word("bread", "ekmek", 2);
        bread.view_count = 3;
        bread.last_viewed = Some(base() + Duration::days(4));

        let zebra = word("zebra", "zebra", 1);

        vec![apple, run, bread, zebra]
    }

    fn names(words: &[SavedWord]) -> Vec<&str> {
        words.iter().map(|w| w.word.as_str()).collect()
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!("Difficult".parse::<StatusFilter>(), Ok(StatusFilter::Difficult));
        assert_eq!(
            "learned".parse::<StatusFilter>(),
            Ok(StatusFilter::Status(WordStatus::Learned))
        );
        assert!("archived".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!("recent".parse::<SortOrder>(), Ok(SortOrder::RecentlyAdded));
        assert_eq!("most-viewed".parse::<SortOrder>(), Ok(SortOrder::MostViewed));
        assert!("random".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_status_and_difficult_filters() {
        let words = sample();
        let learned = WordQuery::new(StatusFilter::Status(WordStatus::Learned), SortOrder::Alphabetical)
            .apply(&words);
        assert_eq!(names(&learned), vec!["Apple"]);

        let difficult = WordQuery::new(StatusFilter::Difficult, SortOrder::Alphabetical).apply(&words);
        assert_eq!(names(&difficult), vec!["run"]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_both_fields() {
        let words = sample();
        let by_word = WordQuery::default().with_search("APP").apply(&words);
        assert_eq!(names(&by_word), vec!["Apple"]);

        let by_translation = WordQuery::default().with_search("Ekm").apply(&words);
        assert_eq!(names(&by_translation), vec!["bread"]);

        let blank = WordQuery::default().with_search("  ").apply(&words);
        assert_eq!(blank.len(), 4);
    }

    #[test]
    fn test_sort_orders_with_stable_ties() {
        let words = sample();
        let sorted = |sort| names(&WordQuery::new(StatusFilter::All, sort).apply(&words))
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        assert_eq!(sorted(SortOrder::Alphabetical), vec!["Apple", "bread", "run", "zebra"]);
        // run and bread tie on day 2; run was inserted first
        assert_eq!(sorted(SortOrder::RecentlyAdded), vec!["run", "bread", "zebra", "Apple"]);
        assert_eq!(sorted(SortOrder::RecentlyViewed), vec!["Apple", "bread", "run", "zebra"]);
        assert_eq!(sorted(SortOrder::LeastViewed), vec!["zebra", "run", "Apple", "bread"]);
        assert_eq!(sorted(SortOrder::MostViewed), vec!["Apple", "bread", "run", "zebra"]);
        assert_eq!(sorted(SortOrder::Progress), vec!["Apple", "run", "bread", "zebra"]);
    }

    #[test]
    fn test_query_is_recomputed() {
        let mut words = sample();
        let query = WordQuery::new(StatusFilter::Status(WordStatus::New), SortOrder::Alphabetical);
        assert_eq!(names(&query.apply(&words)), vec!["bread", "zebra"]);

        words[2].set_progress(60);
        assert_eq!(names(&query.apply(&words)), vec!["zebra"]);
    }
}
