//! Gemini API client
//!
//! Talks to Gemini through its OpenAI-compatible chat-completions endpoint:
//! bearer-token auth, a system + user message list, JSON in and out.
//! Uses a long-lived reqwest::Client for connection pooling.

use super::ModelGateway;
use crate::config::ModelConfig;
use crate::error::AssistantError;
use crate::models::PromptSpec;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Reusable Gemini client (connection-pooled)
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    timeout: Duration,
    temperature: f32,
    max_tokens: u32,
}

impl GeminiClient {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()
            .map_err(|e| AssistantError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: format!("{}/chat/completions", config.base_url),
            timeout: config.timeout,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn build_request(&self, prompt: &PromptSpec) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompt.instructions.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.question.clone(),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> AssistantError {
        if e.is_timeout() {
            AssistantError::ProviderTimeout(self.timeout)
        } else {
            AssistantError::ProviderTransport(e.to_string())
        }
    }
}

#[async_trait]
impl ModelGateway for GeminiClient {
    async fn generate(&self, prompt: &PromptSpec) -> Result<String> {
        let request = self.build_request(prompt);

        info!(model = %self.model, "Calling Gemini API");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini API request failed: {}", e);
                self.transport_error(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read Gemini response body: {}", e);
            self.transport_error(e)
        })?;

        if !status.is_success() {
            error!(status = status.as_u16(), "Gemini API error response: {}", body);
            return Err(AssistantError::ProviderStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            AssistantError::ProviderMalformedReply(format!("Gemini parse error: {}", e))
        })?;

        if let Some(usage) = &parsed.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Gemini token usage"
            );
        }

        let answer = extract_answer(parsed)?;
        info!(chars = answer.len(), "Gemini response received");
        Ok(answer)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn credentials_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// First choice's text, or `EmptyResponse` when there is none
fn extract_answer(response: ChatResponse) -> Result<String> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(AssistantError::EmptyResponse)?;

    if choice.finish_reason.as_deref() == Some("length") {
        warn!("Gemini response truncated at max_tokens");
    }

    match choice.message.content {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(AssistantError::EmptyResponse),
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}
