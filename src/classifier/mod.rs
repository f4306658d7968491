//! Topic gate
//!
//! Decides, before any generation call, whether a message is:
//! - a Greeting (always answered, with a finance tip)
//! - Relevant to Indian financial literacy
//! - OffTopic (declined with a fixed message, no generation call)
//!
//! The greeting check runs first and short-circuits. Relevance is delegated
//! to a `RelevanceStrategy`, chosen once at startup.

use crate::language::LanguageDetector;
use crate::models::{Classification, Language, RelevanceVerdict};
use crate::text::{self, NormalizedText};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

pub mod greeting;
pub mod keywords;
pub mod llm;

pub use greeting::GreetingClassifier;
pub use keywords::KeywordStrategy;
pub use llm::ModelRelevanceStrategy;

/// Returned verbatim for off-topic questions
pub const DECLINE_MESSAGE: &str = "I can answer only questions related to Indian financial literacy \u{2014} \
like budgeting, saving, investing, RBI rules, loans, tax, and government schemes.\n\n\
Please ask something from these topics.";

/// Interchangeable relevance check
#[async_trait]
pub trait RelevanceStrategy: Send + Sync {
    /// Short identifier for logs and `/health`
    fn name(&self) -> &'static str;

    /// Never fails: strategies that can error must fail open.
    async fn check(&self, raw: &str, normalized: &NormalizedText) -> RelevanceVerdict;
}

/// Gate output: the classification plus the question to forward
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDecision {
    pub classification: Classification,
    /// Original question with any explicit language request removed
    pub question: String,
}

pub struct TopicGate {
    strategy: Arc<dyn RelevanceStrategy>,
}

impl TopicGate {
    pub fn new(strategy: Arc<dyn RelevanceStrategy>) -> Self {
        Self { strategy }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Classify a trimmed, non-empty message
    pub async fn classify(&self, raw: &str) -> GateDecision {
        let normalized = text::normalize(raw);

        if GreetingClassifier::is_greeting(&normalized) {
            let detected = LanguageDetector::detect(raw);
            debug!(language = %detected.language, "Greeting detected");
            return GateDecision {
                classification: Classification::Greeting {
                    language: detected.language,
                },
                question: detected.question,
            };
        }

        let verdict = self.strategy.check(raw, &normalized).await;
        let detected = LanguageDetector::detect(raw);

        let language = resolve_language(detected.explicit, detected.language, verdict.language);

        info!(
            strategy = self.strategy.name(),
            relevant = verdict.is_relevant,
            reason = %verdict.reason,
            language = %language,
            "Relevance check completed"
        );

        let classification = if verdict.is_relevant {
            Classification::Relevant { language }
        } else {
            Classification::OffTopic {
                language,
                message: DECLINE_MESSAGE.to_string(),
            }
        };

        GateDecision {
            classification,
            question: detected.question,
        }
    }
}

/// Explicit request > classifier's opinion > local detection
fn resolve_language(explicit: bool, detected: Language, reported: Option<Language>) -> Language {
    if explicit {
        return detected;
    }
    reported.unwrap_or(detected)
}
