use std::sync::Arc;

use tracing::{debug, info, warn};

use super::command::{BotCommand, Input, parse_input};
use super::messages;
use crate::pipeline::{DEFAULT_HISTORY_LIMIT, PipelineError, TranslationPipeline, UserRef};
use crate::session::Direction;

/// Rows of button labels shown under the input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<String>>,
}

impl Keyboard {
    pub fn directions() -> Self {
        Self {
            rows: Direction::KEYBOARD_ROWS
                .iter()
                .map(|row| row.iter().map(|d| d.label().to_string()).collect())
                .collect(),
        }
    }
}

/// A reply to send back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    #[must_use]
    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Maps inbound messages to pipeline calls and pipeline results to replies.
pub struct EventRouter {
    pipeline: Arc<TranslationPipeline>,
}

impl EventRouter {
    pub const fn new(pipeline: Arc<TranslationPipeline>) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &TranslationPipeline {
        &self.pipeline
    }

    /// Handles one inbound message. `None` means no reply is sent.
    pub async fn handle(&self, user: &UserRef, message: &str) -> Option<Reply> {
        match parse_input(message) {
            Input::Empty => None,
            Input::Button(direction) => {
                self.pipeline.select_direction(user.id, direction);
                Some(Reply::text(direction.prompt()))
            }
            Input::Text(text) => self.handle_text(user, &text).await,
            Input::Command(cmd) => Some(self.handle_command(user, cmd).await),
        }
    }

    async fn handle_text(&self, user: &UserRef, text: &str) -> Option<Reply> {
        match self.pipeline.translate_pending(user, text).await {
            Ok(None) => None,
            Ok(Some(translation)) => Some(translation_reply(
                &translation.text,
                translation.history_saved,
            )),
            Err(e) => Some(error_reply(&e)),
        }
    }

    async fn handle_command(&self, user: &UserRef, cmd: BotCommand) -> Reply {
        debug!(user_id = user.id, command = ?cmd, "command received");

        match cmd {
            BotCommand::Start | BotCommand::Help => {
                Reply::text(messages::WELCOME).with_keyboard(Keyboard::directions())
            }
            BotCommand::Translate { lang, text } => {
                let Some(lang) = lang.filter(|_| !text.is_empty()) else {
                    warn!(user_id = user.id, command = "/translate", "invalid format");
                    return Reply::text(messages::TRANSLATE_USAGE);
                };

                info!(user_id = user.id, "translation requested");
                match self.pipeline.translate_explicit(user, &lang, &text).await {
                    Ok(translation) => {
                        translation_reply(&translation.text, translation.history_saved)
                    }
                    Err(e) => error_reply(&e),
                }
            }
            BotCommand::History => {
                match self
                    .pipeline
                    .recent_history(user.id, DEFAULT_HISTORY_LIMIT)
                    .await
                {
                    Ok(records) => Reply::text(messages::format_history(&records)),
                    Err(e) => {
                        warn!(user_id = user.id, error = %e, "history lookup failed");
                        Reply::text(messages::HISTORY_FAILED)
                    }
                }
            }
            BotCommand::Stats => match self.pipeline.usage_stats(user.id).await {
                Ok(stats) => Reply::text(messages::format_stats(stats.as_ref())),
                Err(e) => {
                    warn!(user_id = user.id, error = %e, "stats lookup failed");
                    Reply::text(messages::STATS_FAILED)
                }
            },
            BotCommand::Languages => match self.pipeline.supported_languages().await {
                Ok(languages) => Reply::text(messages::format_languages(&languages)),
                Err(e) => {
                    warn!(user_id = user.id, error = %e, "language catalog lookup failed");
                    Reply::text(messages::LANGUAGES_FAILED)
                }
            },
            BotCommand::Unknown(name) => {
                debug!(user_id = user.id, command = %name, "unknown command");
                Reply::text(messages::UNKNOWN_COMMAND)
            }
        }
    }
}

fn translation_reply(text: &str, history_saved: bool) -> Reply {
    if history_saved {
        Reply::text(text)
    } else {
        Reply::text(messages::translated_without_history(text))
    }
}

fn error_reply(err: &PipelineError) -> Reply {
    match err {
        PipelineError::InvalidLanguageCode(_) => Reply::text(messages::INVALID_LANGUAGE_CODE),
        PipelineError::TranslationFailed(message) => {
            Reply::text(messages::translation_failed(message))
        }
        PipelineError::Store(_) => Reply::text(messages::HISTORY_FAILED),
    }
}
