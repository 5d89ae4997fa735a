//! Durable storage for translation history and per-user usage statistics.
//!
//! History is append-only. Usage is one row per user, only ever changed by
//! an atomic insert-or-increment, never read-modified-written in memory.

mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub use sqlite::SqliteStore;

/// Stable chat identity of a user.
pub type UserId = i64;

/// Source language recorded for every translation; the provider auto-detects it.
pub const AUTO_SOURCE_LANG: &str = "auto";

/// A translation about to be appended to history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTranslation {
    pub user_id: UserId,
    pub username: String,
    pub original: String,
    pub translated: String,
    pub from_lang: String,
    pub to_lang: String,
}

/// A stored history entry. `created_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRecord {
    pub id: i64,
    pub user_id: UserId,
    pub username: String,
    pub original: String,
    pub translated: String,
    pub from_lang: String,
    pub to_lang: String,
    pub created_at: DateTime<Utc>,
}

/// Running usage totals for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageStats {
    pub user_id: UserId,
    pub username: String,
    pub translation_count: u64,
    pub last_used: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open database {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

#[async_trait]
pub trait PersistenceStore: Send + Sync {
    /// Appends one immutable history record.
    async fn append_translation(&self, record: NewTranslation) -> Result<(), StoreError>;

    /// Most recent records for `user_id`, newest first, at most `limit`.
    async fn recent_translations(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<TranslationRecord>, StoreError>;

    /// Inserts a usage row with count 1, or increments the existing one and
    /// refreshes its timestamp and display name, as a single atomic statement.
    async fn upsert_usage(&self, user_id: UserId, username: &str) -> Result<(), StoreError>;

    /// Usage totals, or `None` if the user never translated anything.
    async fn usage(&self, user_id: UserId) -> Result<Option<UsageStats>, StoreError>;
}
