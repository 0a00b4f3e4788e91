//! Persistence layer — SQLite-backed storage for committed entries.

pub mod libsql_backend;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use traits::{EmotionStat, EntryStore, EmotionEntry, NewEntry};
