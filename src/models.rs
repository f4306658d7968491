//! Core data models for the assistant

use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Language =================
//

/// Language the answer must be written in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Bengali,
    Marathi,
    Gujarati,
    Punjabi,
    Odia,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
    Urdu,
    Assamese,
    /// Indic script other than Devanagari, exact language not pinned down
    Regional,
}

/// Accepted spellings, lowercase
const LANGUAGE_NAMES: &[(&str, Language)] = &[
    ("english", Language::English),
    ("hindi", Language::Hindi),
    ("hinglish", Language::Hindi),
    ("bengali", Language::Bengali),
    ("bangla", Language::Bengali),
    ("marathi", Language::Marathi),
    ("gujarati", Language::Gujarati),
    ("punjabi", Language::Punjabi),
    ("panjabi", Language::Punjabi),
    ("odia", Language::Odia),
    ("oriya", Language::Odia),
    ("tamil", Language::Tamil),
    ("telugu", Language::Telugu),
    ("kannada", Language::Kannada),
    ("malayalam", Language::Malayalam),
    ("urdu", Language::Urdu),
    ("assamese", Language::Assamese),
];

impl Language {
    /// Parse a language name ("Hindi", "bangla", ...). `Regional` is never parsed.
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.trim().to_lowercase();
        LANGUAGE_NAMES
            .iter()
            .find(|(n, _)| *n == lowered)
            .map(|(_, lang)| *lang)
    }

    /// All accepted names, for building match patterns
    pub fn known_names() -> impl Iterator<Item = &'static str> {
        LANGUAGE_NAMES.iter().map(|(n, _)| *n)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Bengali => "Bengali",
            Language::Marathi => "Marathi",
            Language::Gujarati => "Gujarati",
            Language::Punjabi => "Punjabi",
            Language::Odia => "Odia",
            Language::Tamil => "Tamil",
            Language::Telugu => "Telugu",
            Language::Kannada => "Kannada",
            Language::Malayalam => "Malayalam",
            Language::Urdu => "Urdu",
            Language::Assamese => "Assamese",
            Language::Regional => "Regional",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

//
// ================= Classification =================
//

/// Outcome of the topic gate for one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Greeting { language: Language },
    Relevant { language: Language },
    OffTopic { language: Language, message: String },
}

impl Classification {
    pub fn language(&self) -> Language {
        match self {
            Classification::Greeting { language }
            | Classification::Relevant { language }
            | Classification::OffTopic { language, .. } => *language,
        }
    }

    pub fn kind(&self) -> AnswerKind {
        match self {
            Classification::Greeting { .. } => AnswerKind::Greeting,
            Classification::Relevant { .. } => AnswerKind::Relevant,
            Classification::OffTopic { .. } => AnswerKind::OffTopic,
        }
    }

    pub fn needs_generation(&self) -> bool {
        !matches!(self, Classification::OffTopic { .. })
    }
}

/// Decision returned by a relevance strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelevanceVerdict {
    pub is_relevant: bool,
    /// Language reported by the strategy, when it has an opinion
    pub language: Option<Language>,
    pub reason: String,
}

impl RelevanceVerdict {
    pub fn relevant(reason: impl Into<String>) -> Self {
        Self {
            is_relevant: true,
            language: None,
            reason: reason.into(),
        }
    }

    pub fn off_topic(reason: impl Into<String>) -> Self {
        Self {
            is_relevant: false,
            language: None,
            reason: reason.into(),
        }
    }
}

//
// ================= Prompt =================
//

/// Assembled instructions plus the user's question, built once per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    pub instructions: String,
    pub question: String,
}

impl PromptSpec {
    /// Single-block rendering: instructions first, question last
    pub fn render(&self) -> String {
        format!("{}\n\nUser question: {}", self.instructions, self.question)
    }
}

//
// ================= Answer =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    Greeting,
    Relevant,
    OffTopic,
    /// Model failed or replied with nothing; a canned message was returned
    Fallback,
}

/// Final reply for one `/ask` call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub response: String,
    pub kind: AnswerKind,
    pub language: Language,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_name() {
        assert_eq!(Language::from_name("Hindi"), Some(Language::Hindi));
        assert_eq!(Language::from_name(" bangla "), Some(Language::Bengali));
        assert_eq!(Language::from_name("oriya"), Some(Language::Odia));
        assert_eq!(Language::from_name("regional"), None);
        assert_eq!(Language::from_name("klingon"), None);
    }

    #[test]
    fn test_language_defaults_to_english() {
        assert_eq!(Language::default(), Language::English);
        assert_eq!(Language::English.to_string(), "English");
    }

    #[test]
    fn test_classification_accessors() {
        let off = Classification::OffTopic {
            language: Language::English,
            message: "nope".to_string(),
        };
        assert_eq!(off.kind(), AnswerKind::OffTopic);
        assert!(!off.needs_generation());

        let greet = Classification::Greeting {
            language: Language::Hindi,
        };
        assert_eq!(greet.language(), Language::Hindi);
        assert!(greet.needs_generation());
    }

    #[test]
    fn test_prompt_render_puts_question_last() {
        let spec = PromptSpec {
            instructions: "Be brief.".to_string(),
            question: "What is PPF?".to_string(),
        };
        assert!(spec.render().ends_with("User question: What is PPF?"));
    }

    #[test]
    fn test_answer_serialization() {
        let answer = Answer {
            response: "ok".to_string(),
            kind: AnswerKind::OffTopic,
            language: Language::Hindi,
        };
        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(json["kind"], "off_topic");
        assert_eq!(json["language"], "hindi");
    }
}
