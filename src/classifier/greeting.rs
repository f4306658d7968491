//! Greeting Classifier
//!
//! Short messages only: a greeting buried in a longer sentence is a question.

use crate::text::{similarity, NormalizedText};

/// Static greeting vocabulary, normalized form
const GREETING_WORDS: &[&str] = &[
    "hi", "hii", "hiii", "hello", "helo", "hey", "heya", "hola", "greetings",
    "namaste", "namaskar", "namaskaram", "vanakkam", "sat sri akal",
    "good morning", "good afternoon", "good evening",
    "hi there", "hello there",
    "नमस्ते", "नमस्कार",
];

/// Token bound above which nothing counts as a greeting
pub const MAX_GREETING_TOKENS: usize = 3;

/// Per-token similarity a typo must exceed
const FUZZY_THRESHOLD: f32 = 0.8;

pub struct GreetingClassifier;

impl GreetingClassifier {
    pub fn is_greeting(normalized: &NormalizedText) -> bool {
        if normalized.is_empty() || normalized.token_count() > MAX_GREETING_TOKENS {
            return false;
        }

        // Whole message is a vocabulary entry ("good morning")
        if GREETING_WORDS.contains(&normalized.text.as_str()) {
            return true;
        }

        // Short message containing an exact greeting token ("hi there sir")
        if normalized
            .tokens
            .iter()
            .any(|t| GREETING_WORDS.contains(&t.as_str()))
        {
            return true;
        }

        // Misspelled greeting ("helloo", "namste")
        normalized.tokens.iter().any(|token| {
            GREETING_WORDS
                .iter()
                .any(|g| similarity(token, g) > FUZZY_THRESHOLD)
        })
    }
}
