//! Bounded, most-recent-first log of past analyses.
//!
//! The whole log is persisted as one JSON array under a named blob after
//! every change. Reading is tolerant: a missing, unreadable or corrupt
//! blob starts an empty log and is never reported to the caller.

mod store;
mod types;

pub use store::HistoryStore;
pub use types::{restore, HistoryItem, RestoredAnalysis};

/// Maximum number of entries kept in the log.
pub const HISTORY_CAPACITY: usize = 10;
