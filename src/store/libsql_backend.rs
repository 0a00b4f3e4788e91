//! libSQL backend — async `EntryStore` implementation.
//!
//! Supports local file and in-memory databases. `libsql::Connection` is
//! `Send + Sync` and safe for concurrent async use; insert atomicity per
//! call comes from SQLite's single-statement transactionality.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::info;

use crate::error::DatabaseError;
use crate::store::traits::{EmotionEntry, EmotionStat, EntryStore, NewEntry};

/// libSQL database backend.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and initialize the schema.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Connection(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Connection(format!("Failed to open database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Connection(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Connection(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Connection(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        Ok(backend)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }

    async fn init_schema(&self) -> Result<(), DatabaseError> {
        self.conn()
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS emotion_logs (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id TEXT NOT NULL,
                    username TEXT NOT NULL,
                    emotion TEXT NOT NULL,
                    intensity INTEGER NOT NULL CHECK (intensity BETWEEN 0 AND 100),
                    trigger_event TEXT NOT NULL DEFAULT '',
                    motivation TEXT NOT NULL DEFAULT '',
                    communication_others TEXT NOT NULL DEFAULT '',
                    self_communication TEXT NOT NULL DEFAULT '',
                    timestamp TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_emotion_logs_user ON emotion_logs(user_id);",
            )
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
        Ok(())
    }
}

/// Column list shared by the read queries.
const ENTRY_COLUMNS: &str = "id, user_id, username, emotion, intensity, trigger_event, \
                             motivation, communication_others, self_communication, timestamp";

/// Map a libsql Row to an EmotionEntry (column order = ENTRY_COLUMNS).
fn row_to_entry(row: &libsql::Row) -> Result<EmotionEntry, libsql::Error> {
    let intensity: i64 = row.get(4)?;
    Ok(EmotionEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        username: row.get(2)?,
        emotion: row.get(3)?,
        intensity: intensity.clamp(0, 100) as u8,
        trigger_event: row.get(5)?,
        motivation: row.get(6)?,
        communication_others: row.get(7)?,
        self_communication: row.get(8)?,
        timestamp: row.get(9)?,
    })
}

#[async_trait]
impl EntryStore for LibSqlBackend {
    async fn insert_entry(&self, entry: &NewEntry) -> Result<i64, DatabaseError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO emotion_logs (user_id, username, emotion, intensity, trigger_event, \
             motivation, communication_others, self_communication, timestamp) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                entry.user_id.as_str(),
                entry.username.as_str(),
                entry.emotion.as_str(),
                entry.intensity as i64,
                entry.trigger_event.as_str(),
                entry.motivation.as_str(),
                entry.communication_others.as_str(),
                entry.self_communication.as_str(),
                entry.timestamp.as_str(),
            ],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("insert_entry: {e}")))?;

        Ok(conn.last_insert_rowid())
    }

    async fn stats_by_user(&self, user_id: &str) -> Result<Vec<EmotionStat>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                "SELECT emotion, COUNT(*), AVG(intensity), MAX(timestamp) \
                 FROM emotion_logs WHERE user_id = ?1 \
                 GROUP BY emotion \
                 ORDER BY COUNT(*) DESC, MIN(id) ASC",
                params![user_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("stats_by_user: {e}")))?;

        let mut stats = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("stats_by_user: {e}")))?
        {
            let emotion: String = row
                .get(0)
                .map_err(|e| DatabaseError::Query(format!("stats_by_user row: {e}")))?;
            let count: i64 = row
                .get(1)
                .map_err(|e| DatabaseError::Query(format!("stats_by_user row: {e}")))?;
            let mean_intensity: f64 = row
                .get(2)
                .map_err(|e| DatabaseError::Query(format!("stats_by_user row: {e}")))?;
            let last_timestamp: String = row
                .get(3)
                .map_err(|e| DatabaseError::Query(format!("stats_by_user row: {e}")))?;
            stats.push(EmotionStat {
                emotion,
                count,
                mean_intensity,
                last_timestamp,
            });
        }
        Ok(stats)
    }

    async fn total_by_user(&self, user_id: &str) -> Result<i64, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                "SELECT COUNT(*) FROM emotion_logs WHERE user_id = ?1",
                params![user_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("total_by_user: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => row
                .get(0)
                .map_err(|e| DatabaseError::Query(format!("total_by_user row: {e}"))),
            Ok(None) => Ok(0),
            Err(e) => Err(DatabaseError::Query(format!("total_by_user: {e}"))),
        }
    }

    async fn history_by_user(&self, user_id: &str) -> Result<Vec<EmotionEntry>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {ENTRY_COLUMNS} FROM emotion_logs WHERE user_id = ?1 \
                     ORDER BY timestamp DESC, id DESC"
                ),
                params![user_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("history_by_user: {e}")))?;

        let mut entries = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("history_by_user: {e}")))?
        {
            match row_to_entry(&row) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!("Skipping entry row: {e}");
                }
            }
        }
        Ok(entries)
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> LibSqlBackend {
        LibSqlBackend::new_memory().await.unwrap()
    }

    fn entry(user_id: &str, emotion: &str, intensity: u8, timestamp: &str) -> NewEntry {
        NewEntry {
            user_id: user_id.to_string(),
            username: "alice".to_string(),
            emotion: emotion.to_string(),
            intensity,
            trigger_event: String::new(),
            motivation: String::new(),
            communication_others: String::new(),
            self_communication: String::new(),
            timestamp: timestamp.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_monotonic_ids() {
        let db = test_db().await;
        let id1 = db
            .insert_entry(&entry("u1", "😡 Гнів", 50, "2024-01-01 10:00:00"))
            .await
            .unwrap();
        let id2 = db
            .insert_entry(&entry("u1", "😨 Страх", 30, "2024-01-01 11:00:00"))
            .await
            .unwrap();
        assert!(id2 > id1);
    }

    #[tokio::test]
    async fn insert_then_history_roundtrip() {
        let db = test_db().await;
        let mut new = entry("u1", "😢 Смуток", 42, "2024-03-05 08:15:00");
        new.trigger_event = "дощ".to_string();
        new.self_communication = "все минеться".to_string();
        let id = db.insert_entry(&new).await.unwrap();

        let history = db.history_by_user("u1").await.unwrap();
        assert_eq!(history.len(), 1);
        let got = &history[0];
        assert_eq!(got.id, id);
        assert_eq!(got.username, "alice");
        assert_eq!(got.emotion, "😢 Смуток");
        assert_eq!(got.intensity, 42);
        assert_eq!(got.trigger_event, "дощ");
        assert_eq!(got.motivation, "");
        assert_eq!(got.self_communication, "все минеться");
        assert_eq!(got.timestamp, "2024-03-05 08:15:00");
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let db = test_db().await;
        db.insert_entry(&entry("u1", "😡 Гнів", 10, "2024-01-01 10:00:00"))
            .await
            .unwrap();
        db.insert_entry(&entry("u1", "😊 Щастя", 20, "2024-01-03 10:00:00"))
            .await
            .unwrap();
        db.insert_entry(&entry("u1", "😨 Страх", 30, "2024-01-02 10:00:00"))
            .await
            .unwrap();

        let history = db.history_by_user("u1").await.unwrap();
        let emotions: Vec<&str> = history.iter().map(|e| e.emotion.as_str()).collect();
        assert_eq!(emotions, vec!["😊 Щастя", "😨 Страх", "😡 Гнів"]);
    }

    #[tokio::test]
    async fn stats_aggregates_and_orders_by_count() {
        let db = test_db().await;
        db.insert_entry(&entry("u1", "😡 Гнів", 50, "2024-01-01 10:00:00"))
            .await
            .unwrap();
        db.insert_entry(&entry("u1", "😡 Гнів", 70, "2024-01-02 10:00:00"))
            .await
            .unwrap();
        db.insert_entry(&entry("u1", "😨 Страх", 30, "2024-01-01 12:00:00"))
            .await
            .unwrap();

        let stats = db.stats_by_user("u1").await.unwrap();
        assert_eq!(stats.len(), 2);

        assert_eq!(stats[0].emotion, "😡 Гнів");
        assert_eq!(stats[0].count, 2);
        assert!((stats[0].mean_intensity - 60.0).abs() < f64::EPSILON);
        assert_eq!(stats[0].last_timestamp, "2024-01-02 10:00:00");

        assert_eq!(stats[1].emotion, "😨 Страх");
        assert_eq!(stats[1].count, 1);
        assert!((stats[1].mean_intensity - 30.0).abs() < f64::EPSILON);
        assert_eq!(stats[1].last_timestamp, "2024-01-01 12:00:00");
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let db = test_db().await;
        db.insert_entry(&entry("u1", "😡 Гнів", 50, "2024-01-01 10:00:00"))
            .await
            .unwrap();
        db.insert_entry(&entry("u2", "😊 Щастя", 80, "2024-01-01 11:00:00"))
            .await
            .unwrap();

        assert_eq!(db.total_by_user("u1").await.unwrap(), 1);
        assert_eq!(db.total_by_user("u2").await.unwrap(), 1);
        assert_eq!(db.total_by_user("u3").await.unwrap(), 0);

        let h1 = db.history_by_user("u1").await.unwrap();
        assert_eq!(h1.len(), 1);
        assert_eq!(h1[0].emotion, "😡 Гнів");
    }

    #[tokio::test]
    async fn empty_user_reads_are_ok_not_err() {
        let db = test_db().await;
        assert!(db.stats_by_user("nobody").await.unwrap().is_empty());
        assert!(db.history_by_user("nobody").await.unwrap().is_empty());
        assert_eq!(db.total_by_user("nobody").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn open_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("nested").join("dir").join("test.db");
        let db = LibSqlBackend::new_local(&db_path).await.unwrap();
        assert!(db_path.exists());
        drop(db);
    }

    #[tokio::test]
    async fn schema_init_is_idempotent() {
        let db = test_db().await;
        db.init_schema().await.unwrap();
        db.init_schema().await.unwrap();
    }
}
