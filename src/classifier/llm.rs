//! Delegated relevance strategy
//!
//! Asks the model for a structured decision and fails open: if the call
//! errors or the reply holds no usable JSON object, the message is treated
//! as relevant so a classifier fault never blocks a legitimate user.

use super::RelevanceStrategy;
use crate::gateway::ModelGateway;
use crate::models::{Language, PromptSpec, RelevanceVerdict};
use crate::text::NormalizedText;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

const CLASSIFIER_INSTRUCTIONS: &str = r#"You are a strict topic classifier for an Indian financial literacy assistant.

Decide whether the user's message is about Indian personal finance or financial literacy:
government schemes (PM-KISAN, Sukanya Samriddhi, APY, PMJDY, ...), RBI rules, banking,
taxation and GST, loans and EMIs, insurance, PF/PPF/NPS, mutual funds, stocks, SIPs,
gold, saving, budgeting, or retirement planning.

Messages may contain spelling mistakes, Hinglish, or any Indian language. Judge intent,
not spelling. Greetings and small talk are NOT relevant.

Also identify the language the user wrote in (e.g. "English", "Hindi", "Bengali", "Tamil").

Return ONLY a JSON object, no explanation text:
{"is_relevant": true, "language": "English", "reason": "<one short sentence>"}"#;

#[derive(Debug, Deserialize)]
struct ClassifierReply {
    is_relevant: bool,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

pub struct ModelRelevanceStrategy {
    gateway: Arc<dyn ModelGateway>,
}

impl ModelRelevanceStrategy {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self { gateway }
    }

    fn build_prompt(raw: &str) -> PromptSpec {
        PromptSpec {
            instructions: CLASSIFIER_INSTRUCTIONS.to_string(),
            question: raw.to_string(),
        }
    }
}

#[async_trait]
impl RelevanceStrategy for ModelRelevanceStrategy {
    fn name(&self) -> &'static str {
        "model"
    }

    async fn check(&self, raw: &str, _normalized: &NormalizedText) -> RelevanceVerdict {
        let reply = match self.gateway.generate(&Self::build_prompt(raw)).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Relevance classifier call failed, failing open: {}", e);
                return RelevanceVerdict::relevant("classifier unavailable");
            }
        };

        match parse_reply(&reply) {
            Some(parsed) => RelevanceVerdict {
                is_relevant: parsed.is_relevant,
                language: parsed.language.as_deref().and_then(Language::from_name),
                reason: parsed
                    .reason
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| "model decision".to_string()),
            },
            None => {
                warn!(reply = %reply, "Relevance classifier reply unparseable, failing open");
                RelevanceVerdict::relevant("classifier reply unparseable")
            }
        }
    }
}

/// First well-formed `{"is_relevant": ...}` object anywhere in the reply
/// (tolerates code fences and surrounding prose).
fn parse_reply(reply: &str) -> Option<ClassifierReply> {
    reply.match_indices('{').find_map(|(idx, _)| {
        serde_json::Deserializer::from_str(&reply[idx..])
            .into_iter::<ClassifierReply>()
            .next()
            .and_then(|parsed| parsed.ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{MockGateway, MockReply};
    use crate::text::normalize;

    async fn run(replies: Vec<MockReply>, message: &str) -> (RelevanceVerdict, Arc<MockGateway>) {
        let gateway = Arc::new(MockGateway::with_replies(replies));
        let strategy = ModelRelevanceStrategy::new(gateway.clone());
        let verdict = strategy.check(message, &normalize(message)).await;
        (verdict, gateway)
    }

    #[test]
    fn test_parse_reply_variants() {
        let plain = parse_reply(r#"{"is_relevant": false, "language": "English", "reason": "weather"}"#)
            .unwrap();
        assert!(!plain.is_relevant);

        let fenced = parse_reply(
            "```json\n{\"is_relevant\": true, \"language\": \"Hindi\", \"reason\": \"tax\"}\n```",
        )
        .unwrap();
        assert!(fenced.is_relevant);
        assert_eq!(fenced.language.as_deref(), Some("Hindi"));

        // Skips a malformed object and takes the next well-formed one
        let noisy = parse_reply(r#"Sure! {oops} then {"is_relevant": true} and {"is_relevant": false}"#)
            .unwrap();
        assert!(noisy.is_relevant);

        assert!(parse_reply("no json here").is_none());
        assert!(parse_reply(r#"{"relevant": "yes"}"#).is_none());
    }

    #[tokio::test]
    async fn test_model_decision_is_used() {
        let reply = r#"{"is_relevant": false, "language": "English", "reason": "Weather is not finance"}"#;
        let (verdict, gateway) = run(vec![MockReply::Text(reply.to_string())], "weather today?").await;

        assert!(!verdict.is_relevant);
        assert_eq!(verdict.language, Some(Language::English));
        assert_eq!(verdict.reason, "Weather is not finance");

        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].question, "weather today?");
        assert!(calls[0].instructions.contains("is_relevant"));
    }

    #[tokio::test]
    async fn test_unknown_language_is_ignored() {
        let reply = r#"{"is_relevant": true, "language": "Klingon", "reason": "loan"}"#;
        let (verdict, _) = run(vec![MockReply::Text(reply.to_string())], "loan?").await;
        assert!(verdict.is_relevant);
        assert_eq!(verdict.language, None);
    }

    #[tokio::test]
    async fn test_fails_open_on_transport_error() {
        let (verdict, _) = run(vec![MockReply::Timeout], "anything").await;
        assert!(verdict.is_relevant);
        assert_eq!(verdict.language, None);
    }

    #[tokio::test]
    async fn test_fails_open_on_garbage() {
        let (verdict, _) = run(vec![MockReply::Text("I think so?".to_string())], "anything").await;
        assert!(verdict.is_relevant);
        assert_eq!(verdict.reason, "classifier reply unparseable");
    }
}
