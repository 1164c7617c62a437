//! Review interval policies
//!
//! Two unrelated rules decide when a word is next due:
//!
//! - Saving a word again backs off exponentially on the number of times it
//!   has been saved: 1, 2, 4, 8... days.
//! - Advancing a word's progress picks an interval from its progress tier.
//!
//! Both are kept as named policies so each call site chooses explicitly.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::models::SavedWord;

/// Reference week length the scaled policy is calibrated against
const REFERENCE_PROGRESS_DAYS: u32 = 7;

/// Largest exponent used by the backoff policy. Anything larger already
/// lands past the representable date range.
const MAX_BACKOFF_EXPONENT: u32 = 40;

/// How the next review date is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum IntervalPolicy {
    /// 2^(reviewCount - 1) days
    ReviewCountBackoff,
    /// 1, 3, 7 or 14 days at progress boundaries 25/50/75
    ProgressTier,
    /// 1, 3, 7 or 30 days at progress boundaries 25/75/100, scaled by
    /// `progress_days / 7`
    #[serde(rename_all = "camelCase")]
    ScaledProgressTier { progress_days: u32 },
}

impl Default for IntervalPolicy {
    fn default() -> Self {
        Self::ProgressTier
    }
}

impl IntervalPolicy {
    /// Interval in whole days for a record in its current state
    pub fn interval_days(&self, word: &SavedWord) -> i64 {
        match *self {
            Self::ReviewCountBackoff => backoff_days(word.review_count),
            Self::ProgressTier => tier_days(word.learning_progress),
            Self::ScaledProgressTier { progress_days } => {
                scaled_tier_days(word.learning_progress, progress_days)
            }
        }
    }

    pub fn next_review(&self, word: &SavedWord, now: DateTime<Utc>) -> DateTime<Utc> {
        add_days(now, self.interval_days(word))
    }
}

/// 2^(review_count - 1) days
pub fn backoff_days(review_count: u32) -> i64 {
    let exponent = review_count.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
    1i64 << exponent
}

pub fn tier_days(progress: u8) -> i64 {
    match progress {
        0..=24 => 1,
        25..=49 => 3,
        50..=74 => 7,
        _ => 14,
    }
}

/// A zero `progress_days` falls back to the reference week.
pub fn scaled_tier_days(progress: u8, progress_days: u32) -> i64 {
    let base: i64 = match progress {
        100..=u8::MAX => 30,
        75..=99 => 7,
        25..=74 => 3,
        _ => 1,
    };
    let progress_days = if progress_days == 0 {
        REFERENCE_PROGRESS_DAYS
    } else {
        progress_days
    };
    let scaled = base as f64 * progress_days as f64 / REFERENCE_PROGRESS_DAYS as f64;
    scaled.round() as i64
}

/// Add whole days, saturating at the largest representable instant
pub fn add_days(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    Duration::try_days(days)
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Describe a review date relative to `now`: "Bugün", "Yarın", or the date
pub fn format_review_date(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let day = date.date_naive();
    let today = now.date_naive();
    if day <= today {
        "Bugün".to_string()
    } else if Some(day) == today.succ_opt() {
        "Yarın".to_string()
    } else {
        date.format("%d.%m.%Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 8, 30, 0).unwrap()
    }

    fn word_with(progress: u8, review_count: u32) -> SavedWord {
        let mut word = SavedWord::new("run".to_string(), "koşmak".to_string(), now());
        word.learning_progress = progress;
        word.review_count = review_count;
        word
    }

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff_days(0), 1);
        assert_eq!(backoff_days(1), 1);
        assert_eq!(backoff_days(2), 2);
        assert_eq!(backoff_days(3), 4);
        assert_eq!(backoff_days(5), 16);
    }

    #[test]
    fn test_backoff_saturates_far_future() {
        let date = IntervalPolicy::ReviewCountBackoff.next_review(&word_with(10, u32::MAX), now());
        assert!(date > now());
    }

    #[test]
    fn test_progress_tiers() {
        assert_eq!(tier_days(0), 1);
        assert_eq!(tier_days(24), 1);
        assert_eq!(tier_days(25), 3);
        assert_eq!(tier_days(50), 7);
        assert_eq!(tier_days(74), 7);
        assert_eq!(tier_days(75), 14);
        assert_eq!(tier_days(100), 14);
    }

    #[test]
    fn test_scaled_tiers() {
        assert_eq!(scaled_tier_days(10, 7), 1);
        assert_eq!(scaled_tier_days(25, 7), 3);
        assert_eq!(scaled_tier_days(74, 7), 3);
        assert_eq!(scaled_tier_days(75, 7), 7);
        assert_eq!(scaled_tier_days(100, 7), 30);

        // 30 * 14 / 7
        assert_eq!(scaled_tier_days(100, 14), 60);
        // 3 * 3 / 7 = 1.29
        assert_eq!(scaled_tier_days(50, 3), 1);
        // 7 * 1 / 7 = 1, 1 * 1 / 7 = 0.14
        assert_eq!(scaled_tier_days(80, 1), 1);
        assert_eq!(scaled_tier_days(0, 1), 0);
        assert_eq!(scaled_tier_days(30, 14), 6);
        assert_eq!(scaled_tier_days(40, 0), 3);
    }

    #[test]
    fn test_policy_dispatch() {
        let word = word_with(60, 3);
        assert_eq!(IntervalPolicy::ReviewCountBackoff.interval_days(&word), 4);
        assert_eq!(IntervalPolicy::ProgressTier.interval_days(&word), 7);
        assert_eq!(
            IntervalPolicy::ScaledProgressTier { progress_days: 7 }.interval_days(&word),
            3
        );
        assert_eq!(
            IntervalPolicy::ProgressTier.next_review(&word, now()),
            now() + Duration::days(7)
        );
    }

    #[test]
    fn test_policy_serde_shape() {
        let json = serde_json::to_value(IntervalPolicy::ScaledProgressTier { progress_days: 14 })
            .unwrap();
        assert_eq!(json["type"], "scaledProgressTier");
        assert_eq!(json["progressDays"], 14);
    }

    #[test]
    fn test_format_review_date() {
        assert_eq!(format_review_date(now(), now()), "Bugün");
        assert_eq!(format_review_date(now() + Duration::days(1), now()), "Yarın");
        assert_eq!(format_review_date(now() + Duration::days(5), now()), "15.05.2024");
    }
}
