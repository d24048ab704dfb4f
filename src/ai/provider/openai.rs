//! OpenAI-compatible Chat Completions Provider
//!
//! Serves OpenAI itself and Groq, which exposes the same API under its own base URL.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{ErrorClassifier, LlmProvider, LlmResponse, ProviderConfig, ResponseTiming, TokenUsage};
use crate::types::{KarooError, Result};

/// Chat Completions provider with secure API key handling
pub struct OpenAiProvider {
    /// "openai" or "groq"; used in logs and error context
    name: String,
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("name", &self.name)
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(name: impl Into<String>, config: ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| KarooError::LlmApi(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            name: name.into(),
            api_key: SecretString::from(config.api_key),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    fn build_request<'a>(&'a self, system: &'a str, prompt: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, system: &str, prompt: &str) -> Result<LlmResponse> {
        debug!(
            "Completing with {} (model: {}, temperature: {})",
            self.name, self.model, self.temperature
        );

        let start_time = Instant::now();
        let request = self.build_request(system, prompt);
        let url = format!("{}/chat/completions", self.api_base);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                KarooError::Llm(ErrorClassifier::classify(
                    &format!("request failed: {}", e),
                    &self.name,
                ))
            })?;

        let elapsed = start_time.elapsed();

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(KarooError::Llm(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &format!("API error ({}): {}", status, body),
                &self.name,
            )));
        }

        let response_body: ChatCompletionResponse = response.json().await.map_err(|e| {
            KarooError::LlmApi(format!("Failed to parse {} response: {}", self.name, e))
        })?;

        let usage = response_body
            .usage
            .map(|u| TokenUsage::from_openai(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let content = response_body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| KarooError::LlmApi(format!("No content in {} response", self.name)))?;

        debug!(
            "{} replied in {}ms ({} tokens)",
            self.name,
            elapsed.as_millis(),
            usage.total()
        );

        Ok(LlmResponse::with_metrics(
            content,
            usage,
            ResponseTiming::from_duration(elapsed),
        ))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.api_base);

        let response = self
            .client
            .get(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!("{} API is available", self.name);
                Ok(true)
            }
            Ok(resp) => {
                warn!("{} API check failed: {}", self.name, resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("{} API check failed: {}", self.name, e);
                Ok(false)
            }
        }
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;

    fn provider() -> OpenAiProvider {
        let config = ProviderConfig::new(
            "gsk_test",
            "llama-3.3-70b-versatile",
            "https://api.groq.com/openai/v1/",
            &LlmConfig::default(),
        );
        OpenAiProvider::new("groq", config).unwrap()
    }

    #[test]
    fn test_request_shape() {
        let p = provider();
        let request = p.build_request("be brief", "hello");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama-3.3-70b-versatile");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_eq!(json["max_tokens"], 2000);
        assert!(json.get("response_format").is_none());
    }

    #[test]
    fn test_debug_redacts_key_and_trims_base() {
        let p = provider();
        let rendered = format!("{:?}", p);
        assert!(!rendered.contains("gsk_test"));
        assert_eq!(p.api_base, "https://api.groq.com/openai/v1");
        assert_eq!(p.name(), "groq");
    }

    #[test]
    fn test_parse_completion_body() {
        let body = r#"{"choices":[{"message":{"content":"SCORE: 80"}}],"usage":{"prompt_tokens":12,"completion_tokens":3}}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("SCORE: 80"));
        assert_eq!(parsed.usage.unwrap().completion_tokens, 3);
    }
}
