//! Durable conversation storage
//!
//! An append-only SQLite log of conversation turns. Every operation opens
//! its own connection with a busy timeout, so the store handle is cheap to
//! clone and safe to share across threads: SQLite serializes writers at
//! the file level, which keeps id assignment strictly increasing with no
//! lost writes, and readers only ever observe committed rows.

use crate::error::{CogitoError, Result};
use anyhow::Context;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection};
use std::path::PathBuf;
use std::time::Duration;

pub mod types;
pub use types::{Sender, Turn};

/// SQLite-backed store for conversation turns
#[derive(Debug, Clone)]
pub struct TurnStore {
    db_path: PathBuf,
    default_window: usize,
}

impl TurnStore {
    /// Create a store at the default location
    ///
    /// Initializes the database file in the user's data directory. The
    /// `COGITO_DB` environment variable overrides the location, which makes
    /// it easy to point the binary at a test DB or alternate file without
    /// changing the user's application data dir.
    ///
    /// # Arguments
    ///
    /// * `default_window` - Turns returned by [`TurnStore::recall`] when the
    ///   requested count is zero
    pub fn new(default_window: usize) -> Result<Self> {
        if let Ok(override_path) = std::env::var("COGITO_DB") {
            return Self::new_with_path(override_path, default_window);
        }

        let proj_dirs = ProjectDirs::from("com", "xbcsmith", "cogito")
            .ok_or_else(|| CogitoError::Storage("Could not determine data directory".into()))?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .context("Failed to create data directory")
            .map_err(|e| CogitoError::Storage(e.to_string()))?;

        let db_path = data_dir.join("conversation.db");
        Self::new_with_path(db_path, default_window)
    }

    /// Create a store that uses the specified database path
    ///
    /// This is primarily useful for tests where the default application
    /// data directory is not desirable (for example, a temporary directory).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cogito::storage::TurnStore;
    ///
    /// let store = TurnStore::new_with_path("/tmp/test_conversation.db", 5).unwrap();
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P, default_window: usize) -> Result<Self> {
        let db_path = db_path.into();

        // Ensure parent directory exists so opening the DB file succeeds.
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for database")
                .map_err(|e| CogitoError::Storage(e.to_string()))?;
        }

        let store = Self {
            db_path,
            default_window,
        };
        store.init()?;
        Ok(store)
    }

    /// Create a store from configuration
    ///
    /// Uses `storage.db_path` when set, the default location otherwise.
    pub fn open(
        storage: &crate::config::StorageConfig,
        recall: &crate::config::RecallConfig,
    ) -> Result<Self> {
        match &storage.db_path {
            Some(path) => Self::new_with_path(path.clone(), recall.default_window),
            None => Self::new(recall.default_window),
        }
    }

    /// Initialize the database schema
    fn init(&self) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS turns (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                sender TEXT NOT NULL,
                text TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create turns table")
        .map_err(|e| CogitoError::Storage(e.to_string()))?;

        Ok(())
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)
            .context("Failed to open database")
            .map_err(|e| CogitoError::Storage(e.to_string()))?;

        // Writers queue behind each other instead of failing immediately.
        conn.busy_timeout(Duration::from_secs(5))
            .context("Failed to set busy timeout")
            .map_err(|e| CogitoError::Storage(e.to_string()))?;

        Ok(conn)
    }

    /// Append a turn to the log
    ///
    /// Assigns the id and timestamp, persists synchronously, and returns
    /// the fully populated turn. The single-row insert is atomic: a turn
    /// is either fully durable or not visible at all.
    ///
    /// # Arguments
    ///
    /// * `sender` - Which side produced the message
    /// * `text` - The message content
    pub fn append(&self, sender: Sender, text: &str) -> Result<Turn> {
        let conn = self.connect()?;
        let timestamp = Utc::now();

        conn.execute(
            "INSERT INTO turns (timestamp, sender, text) VALUES (?, ?, ?)",
            params![timestamp.to_rfc3339(), sender.as_str(), text],
        )
        .context("Failed to insert turn")
        .map_err(|e| CogitoError::Storage(e.to_string()))?;

        let id = conn.last_insert_rowid();

        Ok(Turn {
            id,
            timestamp,
            sender,
            text: text.to_string(),
        })
    }

    /// Fetch the most recent turns in chronological order
    ///
    /// The oldest of the selected window appears first. A `count` of zero
    /// falls back to the configured default window; a count larger than the
    /// total number of turns returns everything.
    pub fn recall(&self, count: usize) -> Result<Vec<Turn>> {
        let count = if count == 0 {
            self.default_window
        } else {
            count
        };

        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT id, timestamp, sender, text FROM turns ORDER BY id DESC LIMIT ?")
            .context("Failed to prepare recall statement")
            .map_err(|e| CogitoError::Storage(e.to_string()))?;

        let mut turns = collect_turns(&mut stmt, params![count as i64])?;
        // Reverse to chronological order.
        turns.reverse();
        Ok(turns)
    }

    /// Fetch all turns whose text contains the keyword, case-insensitive,
    /// in chronological order
    pub fn recall_by_keyword(&self, keyword: &str) -> Result<Vec<Turn>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, timestamp, sender, text FROM turns
                 WHERE instr(lower(text), lower(?)) > 0
                 ORDER BY id ASC",
            )
            .context("Failed to prepare keyword statement")
            .map_err(|e| CogitoError::Storage(e.to_string()))?;

        collect_turns(&mut stmt, params![keyword])
    }

    /// Total number of stored turns
    pub fn len(&self) -> Result<usize> {
        let conn = self.connect()?;
        let count: i64 = conn
            .query_row("SELECT count(*) FROM turns", [], |row| row.get(0))
            .context("Failed to count turns")
            .map_err(|e| CogitoError::Storage(e.to_string()))?;
        Ok(count as usize)
    }

    /// Whether the store holds no turns
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

fn collect_turns(
    stmt: &mut rusqlite::Statement<'_>,
    params: impl rusqlite::Params,
) -> Result<Vec<Turn>> {
    let rows = stmt
        .query_map(params, |row| {
            let id: i64 = row.get(0)?;
            let timestamp_str: String = row.get(1)?;
            let sender_str: String = row.get(2)?;
            let text: String = row.get(3)?;

            let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()); // Fallback if parsing fails

            Ok(Turn {
                id,
                timestamp,
                sender: Sender::from_str_lossy(&sender_str),
                text,
            })
        })
        .context("Failed to query turns")
        .map_err(|e| CogitoError::Storage(e.to_string()))?;

    let mut turns = Vec::new();
    for turn in rows.flatten() {
        turns.push(turn);
    }
    Ok(turns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::tempdir;

    /// Helper: create a temporary store backed by a temp directory.
    ///
    /// Returns both the `TurnStore` and the `TempDir` so the caller keeps
    /// ownership of the directory (preventing it from being removed).
    fn create_test_store() -> (TurnStore, tempfile::TempDir) {
        let dir = tempdir().expect("failed to create tempdir");
        let db_path = dir.path().join("conversation.db");
        let store = TurnStore::new_with_path(db_path, 5).expect("failed to create store");
        (store, dir)
    }

    #[test]
    fn test_init_creates_table() {
        let (store, _dir) = create_test_store();
        let conn = Connection::open(&store.db_path).expect("open connection");
        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type='table' AND name='turns'",
                [],
                |r| r.get(0),
            )
            .expect("query row");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_append_assigns_increasing_ids() {
        let (store, _dir) = create_test_store();
        let first = store.append(Sender::User, "hello").expect("append failed");
        let second = store.append(Sender::Bot, "hi there").expect("append failed");
        assert!(second.id > first.id);
    }

    #[test]
    fn test_append_then_recall_one_returns_just_appended() {
        let (store, _dir) = create_test_store();
        store.append(Sender::User, "first").expect("append failed");
        let appended = store.append(Sender::Bot, "second").expect("append failed");

        let recalled = store.recall(1).expect("recall failed");
        assert_eq!(recalled.len(), 1);
        assert_eq!(recalled[0], appended);
    }

    #[test]
    fn test_recall_window_is_chronological() {
        let (store, _dir) = create_test_store();
        for i in 0..6 {
            store
                .append(Sender::User, &format!("message {}", i))
                .expect("append failed");
        }

        let recalled = store.recall(3).expect("recall failed");
        assert_eq!(recalled.len(), 3);
        assert_eq!(recalled[0].text, "message 3");
        assert_eq!(recalled[1].text, "message 4");
        assert_eq!(recalled[2].text, "message 5");
        assert!(recalled[0].id < recalled[1].id && recalled[1].id < recalled[2].id);
    }

    #[test]
    fn test_recall_more_than_total_returns_all() {
        let (store, _dir) = create_test_store();
        store.append(Sender::User, "only one").expect("append failed");

        let recalled = store.recall(100).expect("recall failed");
        assert_eq!(recalled.len(), 1);
    }

    #[test]
    fn test_recall_zero_uses_default_window() {
        let (store, _dir) = create_test_store();
        for i in 0..8 {
            store
                .append(Sender::User, &format!("m{}", i))
                .expect("append failed");
        }

        // Default window for the test store is 5.
        let recalled = store.recall(0).expect("recall failed");
        assert_eq!(recalled.len(), 5);
        assert_eq!(recalled[0].text, "m3");
    }

    #[test]
    fn test_recall_empty_store() {
        let (store, _dir) = create_test_store();
        assert!(store.recall(5).expect("recall failed").is_empty());
        assert!(store.is_empty().expect("is_empty failed"));
    }

    #[test]
    fn test_recall_by_keyword_case_insensitive() {
        let (store, _dir) = create_test_store();
        store
            .append(Sender::User, "the Weather is nice")
            .expect("append failed");
        store.append(Sender::Bot, "indeed").expect("append failed");
        store
            .append(Sender::User, "weather again")
            .expect("append failed");

        let matches = store.recall_by_keyword("WEATHER").expect("keyword failed");
        assert_eq!(matches.len(), 2);
        assert!(matches[0].id < matches[1].id);
    }

    #[test]
    fn test_recall_by_keyword_no_matches() {
        let (store, _dir) = create_test_store();
        store.append(Sender::User, "hello").expect("append failed");
        let matches = store.recall_by_keyword("absent").expect("keyword failed");
        assert!(matches.is_empty());
    }

    #[test]
    fn test_turns_are_immutable_across_reads() {
        let (store, _dir) = create_test_store();
        let appended = store.append(Sender::User, "fixed text").expect("append");
        let first_read = store.recall(1).expect("recall");
        let second_read = store.recall(1).expect("recall");
        assert_eq!(first_read[0], appended);
        assert_eq!(first_read, second_read);
    }

    #[test]
    fn test_concurrent_appends_yield_unique_increasing_ids() {
        let (store, _dir) = create_test_store();
        let threads = 8;
        let appends_per_thread = 5;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..appends_per_thread {
                        store
                            .append(Sender::User, &format!("thread {} message {}", t, i))
                            .expect("concurrent append failed");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("thread panicked");
        }

        let all = store.recall(1000).expect("recall failed");
        assert_eq!(all.len(), threads * appends_per_thread);

        let ids: Vec<i64> = all.iter().map(|t| t.id).collect();
        assert!(
            ids.windows(2).all(|pair| pair[0] < pair[1]),
            "ids must be unique and strictly increasing"
        );

        // No interleaved or partial text.
        for turn in &all {
            assert!(turn.text.starts_with("thread "));
        }
    }

    #[test]
    fn test_store_survives_reopen() {
        let dir = tempdir().expect("failed to create tempdir");
        let db_path = dir.path().join("conversation.db");

        {
            let store = TurnStore::new_with_path(&db_path, 5).expect("create failed");
            store.append(Sender::User, "persisted").expect("append failed");
        }

        let reopened = TurnStore::new_with_path(&db_path, 5).expect("reopen failed");
        let recalled = reopened.recall(1).expect("recall failed");
        assert_eq!(recalled.len(), 1);
        assert_eq!(recalled[0].text, "persisted");
    }

    #[test]
    fn test_open_uses_configured_path() {
        let dir = tempdir().expect("failed to create tempdir");
        let db_path = dir.path().join("nested").join("conversation.db");

        let storage = crate::config::StorageConfig {
            db_path: Some(db_path.clone()),
        };
        let recall = crate::config::RecallConfig { default_window: 5 };

        let store = TurnStore::open(&storage, &recall).expect("open failed");
        assert_eq!(store.db_path, db_path);
        assert!(db_path.parent().unwrap().exists());
    }

    #[test]
    #[serial]
    fn test_new_respects_env_override() {
        let dir = tempdir().expect("failed to create tempdir");
        let db_path = dir.path().join("override").join("conversation.db");
        env::set_var("COGITO_DB", db_path.to_string_lossy().to_string());

        let store = TurnStore::new(5).expect("new failed with env override");
        assert_eq!(store.db_path, db_path);

        env::remove_var("COGITO_DB");
    }
}
