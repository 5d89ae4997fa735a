//! Translation pipeline behaviour under concurrent requests, backed by a
//! real `SQLite` store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use elarion::pipeline::{TranslationPipeline, UserRef};
use elarion::session::{Direction, SessionRegistry};
use elarion::store::{PersistenceStore, SqliteStore};
use elarion::translation::{Language, LanguageTag, ProviderError, TranslationClient};
use tempfile::TempDir;

/// Echoes the target code and text after a short delay so requests overlap.
struct SlowEchoClient;

#[async_trait]
impl TranslationClient for SlowEchoClient {
    async fn translate(&self, text: &str, target: &LanguageTag) -> Result<String, ProviderError> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(format!("[{target}] {text}"))
    }

    async fn supported_languages(
        &self,
        _display_locale: &str,
    ) -> Result<Vec<Language>, ProviderError> {
        Ok(Vec::new())
    }
}

fn pipeline(temp_dir: &TempDir) -> Arc<TranslationPipeline> {
    let store: Arc<dyn PersistenceStore> =
        Arc::new(SqliteStore::open(&temp_dir.path().join("trans.db")).unwrap());
    Arc::new(TranslationPipeline::new(
        Arc::new(SessionRegistry::new()),
        Arc::new(SlowEchoClient),
        store,
    ))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_translations_count_every_request() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = pipeline(&temp_dir);
    let user = UserRef::new(42, "ann");

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let pipeline = Arc::clone(&pipeline);
            let user = user.clone();
            tokio::spawn(async move {
                pipeline
                    .translate_explicit(&user, "ja", &format!("text {i}"))
                    .await
            })
        })
        .collect();

    for task in tasks {
        let translation = task.await.unwrap().unwrap();
        assert!(translation.history_saved);
    }

    let stats = pipeline.usage_stats(42).await.unwrap().unwrap();
    assert_eq!(stats.translation_count, 20);
    assert_eq!(stats.username, "ann");

    let history = pipeline.recent_history(42, 100).await.unwrap();
    assert_eq!(history.len(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_users_keep_their_own_direction() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = pipeline(&temp_dir);

    let tasks: Vec<_> = (1..=12_i64)
        .map(|user_id| {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move {
                let direction = Direction::ALL[user_id as usize % Direction::ALL.len()];
                let user = UserRef::new(user_id, format!("user{user_id}"));
                pipeline.select_direction(user_id, direction);
                let translation = pipeline
                    .translate_pending(&user, "hello")
                    .await
                    .unwrap()
                    .unwrap();
                (direction, translation)
            })
        })
        .collect();

    for task in tasks {
        let (direction, translation) = task.await.unwrap();
        assert_eq!(translation.target, direction.target());
        assert_eq!(translation.text, format!("[{}] hello", direction.target()));
    }

    assert!(pipeline.sessions().is_empty());
}

#[tokio::test]
async fn test_history_is_newest_first_and_limited() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = pipeline(&temp_dir);
    let user = UserRef::new(5, "bob");

    for i in 0..7 {
        pipeline
            .translate_explicit(&user, "en", &format!("text {i}"))
            .await
            .unwrap();
    }

    let history = pipeline.recent_history(5, 5).await.unwrap();
    let originals: Vec<_> = history.iter().map(|r| r.original.as_str()).collect();
    assert_eq!(
        originals,
        ["text 6", "text 5", "text 4", "text 3", "text 2"]
    );
    assert!(history.iter().all(|r| r.from_lang == "auto" && r.to_lang == "en"));

    assert!(pipeline.recent_history(999, 5).await.unwrap().is_empty());
    assert!(pipeline.usage_stats(999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_text_without_selection_is_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = pipeline(&temp_dir);
    let user = UserRef::new(8, "cy");

    assert!(pipeline.translate_pending(&user, "hello").await.unwrap().is_none());
    assert!(pipeline.usage_stats(8).await.unwrap().is_none());
}
