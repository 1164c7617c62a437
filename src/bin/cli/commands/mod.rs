pub mod config;
pub mod dispatch;
pub mod list;
pub mod stats;
pub mod transfer;
pub mod translate;
pub mod words;
