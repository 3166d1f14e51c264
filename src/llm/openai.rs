//! OpenAI chat-completions backend.

use super::CompletionBackend;
use crate::config::LlmConfig;
use crate::error::{LlmError, Result};
use anyhow::Context as _;
use serde::{Deserialize, Serialize};

/// Default endpoint when no base URL is configured.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Sends extraction prompts to an OpenAI-compatible endpoint in JSON mode.
pub struct OpenAiBackend {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiBackend {
    /// Build a backend from resolved LLM settings. Fails if no key is available.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_ref()
            .map(|secret| secret.expose().to_string())
            .ok_or_else(|| LlmError::MissingProviderKey(config.provider.to_string()))?;

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .with_context(|| "failed to build HTTP client")?;

        Ok(Self {
            http_client,
            endpoint: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body<'a>(&'a self, system: &'a str, user: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        }
    }
}

#[async_trait::async_trait]
impl CompletionBackend for OpenAiBackend {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(system, user))
            .send()
            .await
            .map_err(LlmError::RequestFailed)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ProviderError {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let parsed: ChatResponse = response.json().await.map_err(LlmError::RequestFailed)?;
        extract_content(parsed)
    }
}

fn extract_content(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| LlmError::EmptyResponse.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::Secret;
    use crate::error::Error;

    fn config_with_key(api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            api_key: api_key.map(|key| Secret::new(key)),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn missing_key_fails_at_construction() {
        let result = OpenAiBackend::new(&config_with_key(None));
        assert!(matches!(
            result,
            Err(Error::Llm(LlmError::MissingProviderKey(provider))) if provider == "openai"
        ));
    }

    #[test]
    fn uses_default_endpoint_and_model() {
        let backend = OpenAiBackend::new(&config_with_key(Some("test-key"))).unwrap();
        assert_eq!(backend.endpoint(), DEFAULT_OPENAI_BASE_URL);
        assert_eq!(backend.model(), "gpt-4o");
    }

    #[test]
    fn request_body_requests_json_mode() {
        let backend = OpenAiBackend::new(&config_with_key(Some("test-key"))).unwrap();
        let body = serde_json::to_value(backend.request_body("system prompt", "Input: hi")).unwrap();

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 2000);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Input: hi");
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn content_extraction_requires_non_empty_choice() {
        let full: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"facts\": []}"}}]
        }))
        .unwrap();
        assert_eq!(extract_content(full).unwrap(), "{\"facts\": []}");

        let no_choices: ChatResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(matches!(
            extract_content(no_choices),
            Err(Error::Llm(LlmError::EmptyResponse))
        ));

        let null_content: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [{"message": {"content": null}}]
        }))
        .unwrap();
        assert!(extract_content(null_content).is_err());
    }
}
