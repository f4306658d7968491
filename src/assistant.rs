//! Financial literacy assistant - one request, end to end
//!
//! VALIDATE → GATE → (DECLINE | BUILD PROMPT → GENERATE → CLEAN) → ANSWER
//!
//! Provider failures never escape `answer`: they degrade to a canned reply
//! with `AnswerKind::Fallback`. Only an empty prompt is an error.

use crate::classifier::{KeywordStrategy, ModelRelevanceStrategy, RelevanceStrategy, TopicGate};
use crate::config::{AppConfig, RelevanceMode};
use crate::error::AssistantError;
use crate::gateway::{GeminiClient, ModelGateway};
use crate::models::{Answer, AnswerKind, Classification, Language};
use crate::postprocess::{create_default_cleaner, ResponseCleaner};
use crate::prompt::PromptBuilder;
use crate::Result;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Returned when the model replies with nothing usable
pub const FALLBACK_MESSAGE: &str = "I couldn't put together an answer for that just now. \
Please try rephrasing your question about budgeting, saving, investing, loans, tax, or government schemes.";

/// Returned when the model call itself fails
pub const APOLOGY_MESSAGE: &str = "Sorry, I'm having trouble reaching the answer service right now. \
Please try again in a moment.";

pub const PROMPT_REQUIRED: &str = "Prompt is required";

pub struct FinanceAssistant {
    gate: TopicGate,
    prompts: PromptBuilder,
    gateway: Arc<dyn ModelGateway>,
    cleaner: ResponseCleaner,
}

impl FinanceAssistant {
    pub fn new(strategy: Arc<dyn RelevanceStrategy>, gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            gate: TopicGate::new(strategy),
            prompts: PromptBuilder::new(),
            gateway,
            cleaner: create_default_cleaner(),
        }
    }

    /// Wire the Gemini client and the configured relevance strategy.
    /// The delegated strategy shares the generation client.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let gateway: Arc<dyn ModelGateway> = Arc::new(GeminiClient::new(&config.model)?);

        let strategy: Arc<dyn RelevanceStrategy> = match config.relevance {
            RelevanceMode::Local => Arc::new(KeywordStrategy::new()),
            RelevanceMode::Model => Arc::new(ModelRelevanceStrategy::new(gateway.clone())),
        };

        info!(
            model = gateway.model_name(),
            relevance = strategy.name(),
            "Assistant initialized"
        );

        Ok(Self::new(strategy, gateway))
    }

    pub fn strategy_name(&self) -> &'static str {
        self.gate.strategy_name()
    }

    pub fn model_name(&self) -> &str {
        self.gateway.model_name()
    }

    pub fn credentials_configured(&self) -> bool {
        self.gateway.credentials_configured()
    }

    pub async fn answer(&self, prompt: &str) -> Result<Answer> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AssistantError::Validation(PROMPT_REQUIRED.to_string()));
        }

        let request_id = Uuid::new_v4();
        let started = Instant::now();
        info!(
            request_id = %request_id,
            fingerprint = %fingerprint(prompt),
            chars = prompt.chars().count(),
            "Question received"
        );
        debug!(request_id = %request_id, prompt = %prompt, "Question text");

        let decision = self.gate.classify(prompt).await;
        let language = decision.classification.language();

        let greeting = match &decision.classification {
            Classification::OffTopic { message, .. } => {
                info!(request_id = %request_id, "Question declined as off-topic");
                return Ok(Answer {
                    response: message.clone(),
                    kind: AnswerKind::OffTopic,
                    language,
                });
            }
            Classification::Greeting { .. } => true,
            Classification::Relevant { .. } => false,
        };

        let spec = self.prompts.build(&decision.question, language, greeting);

        let answer = match self.gateway.generate(&spec).await {
            Ok(reply) => {
                let cleaned = self.cleaner.clean(&reply);
                if cleaned.is_empty() {
                    warn!(request_id = %request_id, "Model reply was empty after clean-up");
                    fallback(FALLBACK_MESSAGE, language)
                } else {
                    Answer {
                        response: cleaned,
                        kind: decision.classification.kind(),
                        language,
                    }
                }
            }
            Err(AssistantError::EmptyResponse) => {
                warn!(request_id = %request_id, "Model returned no content");
                fallback(FALLBACK_MESSAGE, language)
            }
            Err(e) => {
                warn!(request_id = %request_id, error = %e, "Model call failed");
                fallback(APOLOGY_MESSAGE, language)
            }
        };

        info!(
            request_id = %request_id,
            kind = ?answer.kind,
            language = %language,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Answer ready"
        );

        Ok(answer)
    }
}

fn fallback(message: &str, language: Language) -> Answer {
    Answer {
        response: message.to_string(),
        kind: AnswerKind::Fallback,
        language,
    }
}

/// Short stable digest so logs can correlate prompts without storing them
fn fingerprint(prompt: &str) -> String {
    let digest = Sha256::digest(prompt.as_bytes());
    hex::encode(digest)[..12].to_string()
}
