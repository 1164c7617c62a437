//! Saved vocabulary and its review schedule
//!
//! This module provides:
//! - The saved-word record and its insertion-ordered mapping
//! - Progress tracking with four learning states
//! - Named review interval policies
//! - Filtering, ordering, and summary statistics

pub mod models;
pub mod query;
pub mod schedule;
pub mod stats;
pub mod store;

pub use models::*;
pub use query::{SortOrder, StatusFilter, WordQuery};
pub use schedule::IntervalPolicy;
pub use stats::VocabularyStats;
pub use store::{is_error_translation, SaveRequest, VocabularyError, WordProgressStore};
