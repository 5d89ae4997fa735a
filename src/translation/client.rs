use async_trait::async_trait;
use thiserror::Error;

use super::language::{Language, LanguageTag};

/// Errors reported by a translation provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to reach translation provider: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("provider returned an unreadable response: {0}")]
    Decode(String),

    #[error("provider returned no translation")]
    Empty,
}

/// An external translation service.
///
/// The source language is always auto-detected by the provider.
#[async_trait]
pub trait TranslationClient: Send + Sync {
    /// Translates `text` into `target`.
    async fn translate(&self, text: &str, target: &LanguageTag) -> Result<String, ProviderError>;

    /// Lists supported languages, with names localised to `display_locale`
    /// where the provider can do so.
    async fn supported_languages(&self, display_locale: &str)
    -> Result<Vec<Language>, ProviderError>;
}

/// Reads an error response body and turns it into [`ProviderError::Api`].
///
/// Both Google and OpenAI-compatible APIs wrap failures as
/// `{"error": {"message": ...}}`; anything else is passed through raw.
pub(crate) async fn api_error(response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ProviderError::Api {
        status,
        message: error_message(&body),
    }
}

pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_json_envelope() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid."}}"#;
        assert_eq!(error_message(body), "API key not valid.");
    }

    #[test]
    fn test_error_message_falls_back_to_raw_body() {
        assert_eq!(error_message("  Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn test_api_error_display() {
        let err = ProviderError::Api {
            status: 403,
            message: "forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "provider returned status 403: forbidden");
    }
}
