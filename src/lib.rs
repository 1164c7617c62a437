//! Vocabulary store for a bilingual subtitle reader.
//!
//! Words saved while watching are kept in a single word-keyed mapping with
//! learning progress and a review schedule. The [`commands::Dispatcher`] is
//! the entry point used by front ends.

pub mod commands;
pub mod export;
pub mod settings;
pub mod storage;
pub mod translation;
pub mod vocabulary;
