//! Telegram Bot API transport using long polling.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bot::{EventRouter, Keyboard, Reply};
use crate::pipeline::UserRef;

const API_BASE: &str = "https://api.telegram.org";
/// Telegram rejects messages longer than this many UTF-16 code units.
pub const MESSAGE_LIMIT: usize = 4096;
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
    from: Option<User>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct User {
    id: i64,
    #[serde(default)]
    is_bot: bool,
    first_name: String,
    username: Option<String>,
}

#[derive(Debug, Serialize)]
struct GetUpdates {
    offset: i64,
    timeout: u64,
    allowed_updates: [&'static str; 1],
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<ReplyKeyboardMarkup<'a>>,
}

#[derive(Debug, Serialize)]
struct ReplyKeyboardMarkup<'a> {
    keyboard: Vec<Vec<KeyboardButton<'a>>>,
    resize_keyboard: bool,
}

#[derive(Debug, Serialize)]
struct KeyboardButton<'a> {
    text: &'a str,
}

impl<'a> From<&'a Keyboard> for ReplyKeyboardMarkup<'a> {
    fn from(keyboard: &'a Keyboard) -> Self {
        Self {
            keyboard: keyboard
                .rows
                .iter()
                .map(|row| row.iter().map(|text| KeyboardButton { text }).collect())
                .collect(),
            resize_keyboard: true,
        }
    }
}

/// A text message from a human user, ready for the router.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IncomingMessage {
    chat_id: i64,
    user: UserRef,
    text: String,
}

impl Update {
    fn into_incoming(self) -> Option<IncomingMessage> {
        let message = self.message?;
        let from = message.from.filter(|u| !u.is_bot)?;
        let text = message.text?;

        let display_name = from.username.unwrap_or(from.first_name);
        Some(IncomingMessage {
            chat_id: message.chat.id,
            user: UserRef::new(from.id, display_name),
            text,
        })
    }
}

pub struct TelegramTransport {
    client: Client,
    api_url: String,
    poll_timeout: Duration,
    router: Arc<EventRouter>,
}

impl TelegramTransport {
    pub fn new(token: &str, poll_timeout: Duration, router: Arc<EventRouter>) -> Result<Self> {
        // The HTTP timeout must outlast the long-poll window.
        let client = Client::builder()
            .timeout(poll_timeout + Duration::from_secs(15))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: format!("{API_BASE}/bot{token}"),
            poll_timeout,
            router,
        })
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{method}", self.api_url))
            .json(body)
            .send()
            .await
            .with_context(|| format!("Telegram request '{method}' failed"))?;

        let status = response.status();
        let parsed: ApiResponse<T> = response
            .json()
            .await
            .with_context(|| format!("Telegram '{method}' returned an unreadable body ({status})"))?;

        match (parsed.ok, parsed.result) {
            (true, Some(result)) => Ok(result),
            _ => bail!(
                "Telegram '{method}' failed ({status}): {}",
                parsed
                    .description
                    .unwrap_or_else(|| "no description".to_string())
            ),
        }
    }

    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                timeout: self.poll_timeout.as_secs(),
                allowed_updates: ["message"],
            },
        )
        .await
    }

    async fn send_reply(&self, chat_id: i64, reply: &Reply) -> Result<()> {
        let chunks = split_message(&reply.text, MESSAGE_LIMIT);
        let last = chunks.len().saturating_sub(1);

        for (i, chunk) in chunks.iter().enumerate() {
            let body = SendMessage {
                chat_id,
                text: chunk,
                reply_markup: reply
                    .keyboard
                    .as_ref()
                    .filter(|_| i == last)
                    .map(ReplyKeyboardMarkup::from),
            };
            let _: serde_json::Value = self.call("sendMessage", &body).await?;
        }

        Ok(())
    }

    async fn dispatch(&self, message: IncomingMessage) {
        let Some(reply) = self.router.handle(&message.user, &message.text).await else {
            return;
        };

        if let Err(e) = self.send_reply(message.chat_id, &reply).await {
            warn!(user_id = message.user.id, error = %e, "failed to send reply");
        }
    }

    /// Polls for updates until Ctrl+C, handling each message on its own task.
    pub async fn run(self: Arc<Self>) -> Result<()> {
        let me: User = self
            .call("getMe", &serde_json::json!({}))
            .await
            .context("Failed to connect to Telegram")?;
        info!(
            bot = me.username.as_deref().unwrap_or(&me.first_name),
            "bot connected"
        );

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        let mut offset = 0;
        let mut backoff = INITIAL_BACKOFF;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown requested, stopping poller");
                    return Ok(());
                }
                result = self.get_updates(offset) => match result {
                    Ok(updates) => {
                        backoff = INITIAL_BACKOFF;
                        for update in updates {
                            offset = offset.max(update.update_id + 1);
                            let Some(message) = update.into_incoming() else {
                                continue;
                            };
                            debug!(user_id = message.user.id, "message received");
                            let this = Arc::clone(&self);
                            tokio::spawn(async move { this.dispatch(message).await });
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, retry_in_secs = backoff.as_secs(), "polling failed");
                        tokio::time::sleep(backoff).await;
                        backoff = (backoff * 2).min(MAX_BACKOFF);
                    }
                }
            }
        }
    }
}

/// Length as Telegram counts it, in UTF-16 code units.
fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Splits `text` into chunks of at most `limit` UTF-16 code units, breaking
/// on line boundaries where possible.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = utf16_len(line);

        if current_len + line_len > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > limit {
            for c in line.chars() {
                let c_len = c.len_utf16();
                if current_len + c_len > limit && !current.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                current.push(c);
                current_len += c_len;
            }
        } else {
            current.push_str(line);
            current_len += line_len;
        }
    }

    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }

    chunks
}
