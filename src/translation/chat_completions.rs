//! Translation through an OpenAI-compatible chat completions endpoint.

use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::client::{ProviderError, TranslationClient, api_error};
use super::language::{Language, LanguageTag, builtin_catalog};
use super::prompt::build_system_prompt;

// Use Cow to avoid cloning strings that are only borrowed for serialization
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Cow<'a, str>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct ChatCompletionsClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl ChatCompletionsClient {
    pub fn new(
        endpoint: String,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            model,
            api_key,
        })
    }

    fn build_request<'a>(&'a self, text: &'a str, target: &LanguageTag) -> ChatCompletionRequest<'a> {
        let language = format!("{} ({})", target.name(), target.as_str());

        ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: Cow::Owned(build_system_prompt(&language)),
                },
                Message {
                    role: "user",
                    content: Cow::Borrowed(text),
                },
            ],
            stream: false,
            temperature: 0.1,
        }
    }
}

#[async_trait]
impl TranslationClient for ChatCompletionsClient {
    async fn translate(&self, text: &str, target: &LanguageTag) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.endpoint.trim_end_matches('/')
        );

        let mut http_request = self.client.post(&url).json(&self.build_request(text, target));

        if let Some(api_key) = &self.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = http_request.send().await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body = response.text().await?;
        parse_completion(&body)
    }

    /// Chat models have no catalog endpoint; the built-in table is used and
    /// names are always English.
    async fn supported_languages(
        &self,
        _display_locale: &str,
    ) -> Result<Vec<Language>, ProviderError> {
        Ok(builtin_catalog())
    }
}

fn parse_completion(body: &str) -> Result<String, ProviderError> {
    let response: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    let content: String = response
        .choices
        .into_iter()
        .filter_map(|c| c.message.content)
        .collect();

    let content = content.trim();
    if content.is_empty() {
        Err(ProviderError::Empty)
    } else {
        Ok(content.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> ChatCompletionsClient {
        ChatCompletionsClient::new(
            "http://localhost:11434".to_string(),
            "gemma3:12b".to_string(),
            None,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_request_carries_target_language_in_system_prompt() {
        let client = client();
        let target = LanguageTag::parse("ja").unwrap();
        let request = client.build_request("Hello", &target);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gemma3:12b");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert!(
            json["messages"][0]["content"]
                .as_str()
                .unwrap()
                .contains("Japanese (ja)")
        );
        assert_eq!(json["messages"][1]["content"], "Hello");
    }

    #[test]
    fn test_parse_completion_trims_content() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": " こんにちは\n"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "こんにちは");
    }

    #[test]
    fn test_parse_completion_without_content_is_empty() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        assert!(matches!(parse_completion(body), Err(ProviderError::Empty)));
    }

    #[tokio::test]
    async fn test_catalog_is_builtin() {
        let langs = client().supported_languages("ru").await.unwrap();
        assert!(langs.iter().any(|l| l.code == "en" && l.name == "English"));
    }
}
