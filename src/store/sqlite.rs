use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use super::{
    NewTranslation, PersistenceStore, StoreError, TranslationRecord, UsageStats, UserId,
};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS translations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        username TEXT NOT NULL,
        original TEXT NOT NULL,
        translated TEXT NOT NULL,
        from_lang TEXT NOT NULL,
        to_lang TEXT NOT NULL,
        created_at INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_translations_user_created
        ON translations(user_id, created_at);
    CREATE TABLE IF NOT EXISTS usage_stats (
        user_id INTEGER PRIMARY KEY,
        username TEXT NOT NULL,
        translation_count INTEGER NOT NULL DEFAULT 0,
        last_used INTEGER NOT NULL
    );";

/// `SQLite`-backed store.
///
/// One long-lived connection is shared behind a mutex; every call runs on the
/// blocking thread pool so the async runtime never waits on disk I/O.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Backend(format!(
                    "failed to create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.display().to_string(),
            source,
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!(path = %path.display(), "translation store opened");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path.to_path_buf()),
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let result = tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Backend(format!("storage task failed: {e}")))?;

        Ok(result?)
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Reads a millisecond timestamp column, rejecting values chrono cannot represent.
fn timestamp_at(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let millis: i64 = row.get(idx)?;
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("timestamp {millis} is out of range").into(),
        )
    })
}

#[async_trait]
impl PersistenceStore for SqliteStore {
    async fn append_translation(&self, record: NewTranslation) -> Result<(), StoreError> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO translations
                 (user_id, username, original, translated, from_lang, to_lang, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.user_id,
                    record.username,
                    record.original,
                    record.translated,
                    record.from_lang,
                    record.to_lang,
                    now_millis(),
                ],
            )
            .map(|_| ())
        })
        .await
    }

    async fn recent_translations(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<TranslationRecord>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, username, original, translated, from_lang, to_lang, created_at
                 FROM translations
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2",
            )?;

            let rows = stmt.query_map(params![user_id, limit], |row| {
                Ok(TranslationRecord {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    username: row.get(2)?,
                    original: row.get(3)?,
                    translated: row.get(4)?,
                    from_lang: row.get(5)?,
                    to_lang: row.get(6)?,
                    created_at: timestamp_at(row, 7)?,
                })
            })?;

            rows.collect()
        })
        .await
    }

    async fn upsert_usage(&self, user_id: UserId, username: &str) -> Result<(), StoreError> {
        let username = username.to_string();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO usage_stats (user_id, username, translation_count, last_used)
                 VALUES (?1, ?2, 1, ?3)
                 ON CONFLICT (user_id) DO UPDATE SET
                     username = excluded.username,
                     translation_count = translation_count + 1,
                     last_used = excluded.last_used",
                params![user_id, username, now_millis()],
            )
            .map(|_| ())
        })
        .await
    }

    async fn usage(&self, user_id: UserId) -> Result<Option<UsageStats>, StoreError> {
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT user_id, username, translation_count, last_used
                 FROM usage_stats WHERE user_id = ?1",
                params![user_id],
                |row| {
                    let count: i64 = row.get(2)?;
                    Ok(UsageStats {
                        user_id: row.get(0)?,
                        username: row.get(1)?,
                        translation_count: count.max(0) as u64,
                        last_used: timestamp_at(row, 3)?,
                    })
                },
            )
            .optional()
        })
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::AUTO_SOURCE_LANG;
    use tempfile::TempDir;

    fn record(user_id: UserId, original: &str) -> NewTranslation {
        NewTranslation {
            user_id,
            username: "alice".to_string(),
            original: original.to_string(),
            translated: format!("{original} (ru)"),
            from_lang: AUTO_SOURCE_LANG.to_string(),
            to_lang: "ru".to_string(),
        }
    }

    #[tokio::test]
    async fn test_history_is_newest_first_and_limited() {
        let store = SqliteStore::open_in_memory().unwrap();
        for i in 0..7 {
            store
                .append_translation(record(1, &format!("text {i}")))
                .await
                .unwrap();
        }

        let history = store.recent_translations(1, 5).await.unwrap();

        let originals: Vec<_> = history.iter().map(|r| r.original.as_str()).collect();
        assert_eq!(
            originals,
            vec!["text 6", "text 5", "text 4", "text 3", "text 2"]
        );
        assert!(
            history
                .windows(2)
                .all(|pair| pair[0].created_at >= pair[1].created_at)
        );
    }

    #[tokio::test]
    async fn test_history_is_per_user() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.append_translation(record(1, "mine")).await.unwrap();
        store.append_translation(record(2, "theirs")).await.unwrap();

        let history = store.recent_translations(1, 5).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].original, "mine");
        assert_eq!(history[0].from_lang, "auto");
        assert_eq!(history[0].to_lang, "ru");

        assert!(store.recent_translations(3, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_usage_absent_until_first_upsert() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.usage(42).await.unwrap().is_none());

        store.upsert_usage(42, "bob").await.unwrap();

        let stats = store.usage(42).await.unwrap().unwrap();
        assert_eq!(stats.translation_count, 1);
        assert_eq!(stats.username, "bob");
    }

    #[tokio::test]
    async fn test_upsert_increments_and_refreshes() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.upsert_usage(7, "old_name").await.unwrap();
        let first = store.usage(7).await.unwrap().unwrap();

        store.upsert_usage(7, "new_name").await.unwrap();
        store.upsert_usage(7, "new_name").await.unwrap();
        let stats = store.usage(7).await.unwrap().unwrap();

        assert_eq!(stats.translation_count, 3);
        assert_eq!(stats.username, "new_name");
        assert!(stats.last_used >= first.last_used);
    }

    #[tokio::test]
    async fn test_last_used_tracks_latest_translation() {
        let store = SqliteStore::open_in_memory().unwrap();
        for i in 0..3 {
            store
                .append_translation(record(9, &format!("text {i}")))
                .await
                .unwrap();
            store.upsert_usage(9, "alice").await.unwrap();
        }

        let latest = store.recent_translations(9, 1).await.unwrap().remove(0);
        let stats = store.usage(9).await.unwrap().unwrap();

        assert_eq!(latest.original, "text 2");
        assert_eq!(stats.translation_count, 3);
        assert!(stats.last_used >= latest.created_at);
        assert!(stats.last_used - latest.created_at < chrono::Duration::seconds(5));
    }

    #[tokio::test]
    async fn test_out_of_range_timestamp_is_an_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO usage_stats (user_id, username, translation_count, last_used)
                     VALUES (1, 'alice', 1, ?1)",
                    params![i64::MAX],
                )
            })
            .await
            .unwrap();

        let err = store.usage(1).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Sqlite(rusqlite::Error::FromSqlConversionFailure(3, Type::Integer, _))
        ));
    }

    #[tokio::test]
    async fn test_open_creates_file_and_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("trans.db");

        {
            let store = SqliteStore::open(&db_path).unwrap();
            assert_eq!(store.path(), Some(db_path.as_path()));
            store.upsert_usage(1, "alice").await.unwrap();
        }

        let store = SqliteStore::open(&db_path).unwrap();
        let stats = store.usage(1).await.unwrap().unwrap();
        assert_eq!(stats.translation_count, 1);
    }
}
