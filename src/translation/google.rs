//! Google Cloud Translation (v2 REST) client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::client::{ProviderError, TranslationClient, api_error};
use super::language::{Language, LanguageTag};

pub const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com";

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    q: [&'a str; 1],
    target: &'a str,
    format: &'static str,
}

#[derive(Debug, Serialize)]
struct LanguagesBody<'a> {
    target: &'a str,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct TranslationsData {
    translations: Vec<TranslationItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslationItem {
    translated_text: String,
    detected_source_language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LanguagesData {
    languages: Vec<LanguageItem>,
}

#[derive(Debug, Deserialize)]
struct LanguageItem {
    language: String,
    name: Option<String>,
}

pub struct GoogleTranslateClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GoogleTranslateClient {
    pub fn new(endpoint: String, api_key: String, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/language/translate/v2{path}",
            self.endpoint.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl TranslationClient for GoogleTranslateClient {
    async fn translate(&self, text: &str, target: &LanguageTag) -> Result<String, ProviderError> {
        let body = TranslateBody {
            q: [text],
            target: target.as_str(),
            format: "text",
        };

        let response = self
            .client
            .post(self.url(""))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body = response.text().await?;
        parse_translation(&body)
    }

    async fn supported_languages(
        &self,
        display_locale: &str,
    ) -> Result<Vec<Language>, ProviderError> {
        let response = self
            .client
            .post(self.url("/languages"))
            .header("x-goog-api-key", &self.api_key)
            .json(&LanguagesBody {
                target: display_locale,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body = response.text().await?;
        parse_languages(&body)
    }
}

fn parse_translation(body: &str) -> Result<String, ProviderError> {
    let envelope: Envelope<TranslationsData> =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    let item = envelope
        .data
        .translations
        .into_iter()
        .next()
        .ok_or(ProviderError::Empty)?;

    if let Some(source) = &item.detected_source_language {
        debug!(source = %source, "provider detected source language");
    }

    Ok(item.translated_text)
}

fn parse_languages(body: &str) -> Result<Vec<Language>, ProviderError> {
    let envelope: Envelope<LanguagesData> =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    Ok(envelope
        .data
        .languages
        .into_iter()
        .map(|item| {
            let name = item.name.unwrap_or_else(|| item.language.clone());
            Language::new(item.language, name)
        })
        .collect())
}
