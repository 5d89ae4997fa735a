//! End-to-end handling of a single translation request.
//!
//! A request resolves its target language (from the user's pending
//! selection or from explicit command input), calls the provider, then
//! writes history and usage independently of each other. Neither write can
//! turn a successful translation into a failure.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::session::{Direction, SessionRegistry};
use crate::store::{
    AUTO_SOURCE_LANG, NewTranslation, PersistenceStore, StoreError, TranslationRecord,
    UsageStats, UserId,
};
use crate::translation::{Language, LanguageTag, TranslationClient};

/// Number of entries returned by the history command.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Locale for language names when none is configured.
pub const DEFAULT_LANGUAGES_LOCALE: &str = "ru";

/// The user an event came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: UserId,
    pub display_name: String,
}

impl UserRef {
    pub fn new(id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

/// A successful translation.
///
/// `history_saved == false` is a degraded success: the user still gets the
/// text, with a notice that it was not recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub target: LanguageTag,
    pub history_saved: bool,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid language code: '{0}'")]
    InvalidLanguageCode(String),

    #[error("translation failed: {0}")]
    TranslationFailed(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct TranslationPipeline {
    sessions: Arc<SessionRegistry>,
    client: Arc<dyn TranslationClient>,
    store: Arc<dyn PersistenceStore>,
    languages_locale: String,
}

impl TranslationPipeline {
    pub fn new(
        sessions: Arc<SessionRegistry>,
        client: Arc<dyn TranslationClient>,
        store: Arc<dyn PersistenceStore>,
    ) -> Self {
        Self {
            sessions,
            client,
            store,
            languages_locale: DEFAULT_LANGUAGES_LOCALE.to_string(),
        }
    }

    #[must_use]
    pub fn with_languages_locale(mut self, locale: impl Into<String>) -> Self {
        self.languages_locale = locale.into();
        self
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Remembers `direction` as the user's pending selection.
    pub fn select_direction(&self, user_id: UserId, direction: Direction) {
        debug!(user_id, direction = direction.token(), "direction selected");
        self.sessions.set(user_id, direction);
    }

    /// Translates free text against the user's pending selection.
    ///
    /// Returns `Ok(None)` when nothing is pending; the message is ignored.
    /// Once a selection was found it is cleared after the provider call,
    /// whatever the outcome, unless the user picked a new direction while
    /// the call was in flight.
    pub async fn translate_pending(
        &self,
        user: &UserRef,
        text: &str,
    ) -> Result<Option<Translation>, PipelineError> {
        let Some(selection) = self.sessions.selection(user.id) else {
            debug!(user_id = user.id, "no pending direction, ignoring text");
            return Ok(None);
        };

        let result = self.run(user, text, selection.direction.target()).await;
        if !self.sessions.clear_if(user.id, selection.generation) {
            debug!(user_id = user.id, "selection replaced during translation, keeping it");
        }

        result.map(Some)
    }

    /// Translates text into a target given explicitly by the user.
    /// Never reads or writes the session registry.
    pub async fn translate_explicit(
        &self,
        user: &UserRef,
        lang_token: &str,
        text: &str,
    ) -> Result<Translation, PipelineError> {
        let target = LanguageTag::parse(lang_token)
            .map_err(|e| PipelineError::InvalidLanguageCode(e.0))?;

        self.run(user, text, target).await
    }

    async fn run(
        &self,
        user: &UserRef,
        text: &str,
        target: LanguageTag,
    ) -> Result<Translation, PipelineError> {
        let translated = self.client.translate(text, &target).await.map_err(|e| {
            warn!(user_id = user.id, target = %target, error = %e, "provider call failed");
            PipelineError::TranslationFailed(e.to_string())
        })?;

        let record = NewTranslation {
            user_id: user.id,
            username: user.display_name.clone(),
            original: text.to_string(),
            translated: translated.clone(),
            from_lang: AUTO_SOURCE_LANG.to_string(),
            to_lang: target.to_string(),
        };

        let history_saved = match self.store.append_translation(record).await {
            Ok(()) => true,
            Err(e) => {
                warn!(user_id = user.id, error = %e, "failed to save translation history");
                false
            }
        };

        if let Err(e) = self.store.upsert_usage(user.id, &user.display_name).await {
            warn!(user_id = user.id, error = %e, "failed to update usage stats");
        }

        info!(user_id = user.id, target = %target, history_saved, "translation completed");

        Ok(Translation {
            text: translated,
            target,
            history_saved,
        })
    }

    /// Most recent translations, newest first. Empty when there are none.
    pub async fn recent_history(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<TranslationRecord>, PipelineError> {
        Ok(self.store.recent_translations(user_id, limit).await?)
    }

    /// Usage totals, or `None` before the first translation.
    pub async fn usage_stats(&self, user_id: UserId) -> Result<Option<UsageStats>, PipelineError> {
        Ok(self.store.usage(user_id).await?)
    }

    pub async fn supported_languages(&self) -> Result<Vec<Language>, PipelineError> {
        self.client
            .supported_languages(&self.languages_locale)
            .await
            .map_err(|e| PipelineError::TranslationFailed(e.to_string()))
    }
}
