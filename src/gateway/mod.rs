//! External Model Gateway
//!
//! One outbound call per invocation, bounded by the configured timeout.
//! No retries: a failed call is reported once and the caller decides.

use crate::error::AssistantError;
use crate::models::PromptSpec;
use crate::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

pub mod gemini;
pub use gemini::GeminiClient;

/// Trait for text generation (LLM controlled)
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Send the prompt and return the model's text reply.
    ///
    /// Errors: `ProviderTimeout`, `ProviderTransport`, `ProviderStatus`,
    /// `ProviderMalformedReply`, `EmptyResponse`.
    async fn generate(&self, prompt: &PromptSpec) -> Result<String>;

    /// Model identifier reported by `/health`
    fn model_name(&self) -> &str;

    fn credentials_configured(&self) -> bool {
        true
    }
}

/// Scripted reply for `MockGateway`
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Empty,
    Timeout,
    Status(u16),
}

/// In-process gateway for development & testing.
/// Replays scripted replies in order, then answers with a fixed text.
pub struct MockGateway {
    replies: Mutex<VecDeque<MockReply>>,
    calls: Mutex<Vec<PromptSpec>>,
}

pub const MOCK_ANSWER: &str = "### Mock answer\n\nThis reply came from the mock gateway.";

impl MockGateway {
    pub fn new() -> Self {
        Self::with_replies(Vec::new())
    }

    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt received so far, oldest first
    pub fn calls(&self) -> Vec<PromptSpec> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelGateway for MockGateway {
    async fn generate(&self, prompt: &PromptSpec) -> Result<String> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(prompt.clone());

        let next = self
            .replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();

        match next {
            None => Ok(MOCK_ANSWER.to_string()),
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Empty) => Err(AssistantError::EmptyResponse),
            Some(MockReply::Timeout) => Err(AssistantError::ProviderTimeout(Duration::from_secs(30))),
            Some(MockReply::Status(status)) => Err(AssistantError::ProviderStatus {
                status,
                body: "mock provider error".to_string(),
            }),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
