//! The `EntryStore` trait — async interface over committed entries.

use async_trait::async_trait;

use crate::error::DatabaseError;

/// A committed, immutable emotion-log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmotionEntry {
    /// Store-assigned, monotonically increasing.
    pub id: i64,
    pub user_id: String,
    /// Display-name snapshot taken at commit time.
    pub username: String,
    pub emotion: String,
    /// 0–100 inclusive.
    pub intensity: u8,
    /// Empty string means the step was skipped.
    pub trigger_event: String,
    pub motivation: String,
    pub communication_others: String,
    pub self_communication: String,
    /// Local wall clock, `%Y-%m-%d %H:%M:%S`.
    pub timestamp: String,
}

/// Insert payload — everything but the store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub user_id: String,
    pub username: String,
    pub emotion: String,
    pub intensity: u8,
    pub trigger_event: String,
    pub motivation: String,
    pub communication_others: String,
    pub self_communication: String,
    pub timestamp: String,
}

/// One row of the per-user aggregate statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionStat {
    pub emotion: String,
    pub count: i64,
    pub mean_intensity: f64,
    pub last_timestamp: String,
}

/// Backend-agnostic store for committed entries.
///
/// Zero rows is `Ok(empty)`; a store fault is `Err` — callers can tell
/// "no data" apart from "store broken".
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Append one entry. Returns the assigned id. Atomic per call.
    async fn insert_entry(&self, entry: &NewEntry) -> Result<i64, DatabaseError>;

    /// Per-emotion aggregates for one user, ordered by count descending.
    async fn stats_by_user(&self, user_id: &str) -> Result<Vec<EmotionStat>, DatabaseError>;

    /// Total number of entries for one user.
    async fn total_by_user(&self, user_id: &str) -> Result<i64, DatabaseError>;

    /// Full history for one user, newest first.
    async fn history_by_user(&self, user_id: &str) -> Result<Vec<EmotionEntry>, DatabaseError>;
}
