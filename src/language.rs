//! Language Detector
//!
//! Precedence:
//! 1. Explicit language request ("answer in Bengali", "... in Tamil language",
//!    a closing "in Hindi?"), which is stripped from the question. A language
//!    name used as an ordinary word ("Tamil Nadu") is not a request.
//! 2. Indic script: Devanagari → Hindi, any other Indic block → Regional
//! 3. Romanized Hindi function words → Hindi
//! 4. English

use crate::models::Language;
use crate::text::{self, IndicScript};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Romanized Hindi words that are not also English words ("mere", "hum" are left out)
const TRANSLITERATED_WORDS: &[&str] = &[
    // Interrogatives
    "kya", "kaise", "kaisa", "kaisi", "kaun", "kaunsa", "kaunsi", "kab", "kahan", "kyun", "kyon",
    "kitna", "kitne", "kitni",
    // Pronouns
    "mujhe", "mera", "meri", "aap", "aapka", "aapko", "hamara", "hume", "humein",
    // Verbs & particles
    "hai", "hain", "batao", "bataiye", "bataye", "samjhao", "chahiye", "karna", "karein", "karu",
    "sakta", "sakte", "sakti", "nahi", "nahin", "liye", "wala", "wali",
    // Money words
    "paisa", "paise", "rupaye", "bachat",
];

lazy_static! {
    static ref EXPLICIT_LANGUAGE: Regex = {
        let names = Language::known_names().collect::<Vec<_>>().join("|");
        Regex::new(&format!(
            concat!(
                r"(?i)",
                // "answer in Hindi", "please reply in tamil language"
                r"\b(?:please\s+)?(?:answer|reply|respond|explain|write|tell\s+me)\s+in\s+(?P<verb>{names})\b(?:\s+language\b)?",
                // "in Tamil language" anywhere
                r"|\bin\s+(?P<named>{names})\s+language\b",
                // "in Bengali" closing the message, trailing punctuation kept
                r"|\bin\s+(?P<closing>{names})\b(?P<end>\s*[?.!]*\s*$)",
            ),
            names = names
        ))
        .expect("valid language pattern")
    };
    static ref MULTI_SPACE: Regex = Regex::new(r"\s{2,}").expect("valid whitespace pattern");
    static ref SPACE_BEFORE_PUNCT: Regex =
        Regex::new(r"\s+([?.!,;:])").expect("valid punctuation pattern");
}

/// Detected language and the question with any language request removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedLanguage {
    pub language: Language,
    pub question: String,
    /// The user named the language explicitly
    pub explicit: bool,
}

pub struct LanguageDetector;

impl LanguageDetector {
    pub fn detect(raw: &str) -> DetectedLanguage {
        let trimmed = raw.trim();

        if let Some((language, question)) = extract_explicit_language(trimmed) {
            return DetectedLanguage {
                language,
                question,
                explicit: true,
            };
        }

        DetectedLanguage {
            language: Self::detect_implicit(trimmed),
            question: trimmed.to_string(),
            explicit: false,
        }
    }

    /// Script and transliteration rules only, no explicit-name handling
    pub fn detect_implicit(raw: &str) -> Language {
        let scripts = text::indic_scripts(raw);
        if scripts.contains(&IndicScript::Devanagari) {
            return Language::Hindi;
        }
        if !scripts.is_empty() {
            return Language::Regional;
        }

        let normalized = text::normalize(raw);
        if normalized
            .tokens
            .iter()
            .any(|t| TRANSLITERATED_WORDS.contains(&t.as_str()))
        {
            return Language::Hindi;
        }

        Language::English
    }
}

/// Find the first language request and strip every request from the text.
fn extract_explicit_language(text: &str) -> Option<(Language, String)> {
    let caps = EXPLICIT_LANGUAGE.captures(text)?;
    let name = caps
        .name("verb")
        .or_else(|| caps.name("named"))
        .or_else(|| caps.name("closing"))?;
    let language = Language::from_name(name.as_str())?;

    let stripped = EXPLICIT_LANGUAGE.replace_all(text, |caps: &Captures| {
        format!(" {}", caps.name("end").map_or("", |m| m.as_str()))
    });
    let collapsed = MULTI_SPACE.replace_all(stripped.trim(), " ");
    let tidied = SPACE_BEFORE_PUNCT.replace_all(&collapsed, "$1");
    let question = tidied
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '-'))
        .to_string();

    // A message that was only a language request keeps its text
    if text::normalize(&question).is_empty() {
        return Some((language, text.to_string()));
    }

    Some((language, question))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_language_overrides_and_is_stripped() {
        let d = LanguageDetector::detect("Explain PPF in Bengali");
        assert_eq!(d.language, Language::Bengali);
        assert_eq!(d.question, "Explain PPF");
        assert!(d.explicit);

        let d = LanguageDetector::detect("Answer in Hindi: how much tax on FD interest?");
        assert_eq!(d.language, Language::Hindi);
        assert_eq!(d.question, "how much tax on FD interest?");

        let d = LanguageDetector::detect("what is sukanya samriddhi yojana in tamil language?");
        assert_eq!(d.language, Language::Tamil);
        assert_eq!(d.question, "what is sukanya samriddhi yojana?");
    }

    #[test]
    fn test_explicit_beats_script() {
        // Devanagari text, but the user asks for English
        let d = LanguageDetector::detect("पीपीएफ क्या है in english");
        assert_eq!(d.language, Language::English);
        assert_eq!(d.question, "पीपीएफ क्या है");
    }

    #[test]
    fn test_script_detection() {
        assert_eq!(LanguageDetector::detect("मुझे पैसे बचाने हैं").language, Language::Hindi);
        assert_eq!(LanguageDetector::detect("সঞ্চয় কিভাবে করব").language, Language::Regional);
        assert_eq!(LanguageDetector::detect("சேமிப்பு திட்டம்").language, Language::Regional);
    }

    #[test]
    fn test_transliterated_words() {
        let d = LanguageDetector::detect("SIP kya hai aur kaise shuru kare?");
        assert_eq!(d.language, Language::Hindi);
        assert!(!d.explicit);
        assert_eq!(d.question, "SIP kya hai aur kaise shuru kare?");
    }

    #[test]
    fn test_defaults_to_english() {
        let d = LanguageDetector::detect("  How do I apply for PM-KISAN scheme  ");
        assert_eq!(d.language, Language::English);
        assert_eq!(d.question, "How do I apply for PM-KISAN scheme");
    }

    #[test]
    fn test_bare_language_name_is_not_a_request() {
        let d = LanguageDetector::detect("Hindi");
        assert_eq!(d.language, Language::English);
        assert!(!d.explicit);
        assert_eq!(d.question, "Hindi");

        // A request with nothing else keeps its text
        let d = LanguageDetector::detect("in Hindi");
        assert_eq!(d.language, Language::Hindi);
        assert_eq!(d.question, "in Hindi");
    }

    #[test]
    fn test_language_names_inside_questions_are_kept() {
        for question in [
            "What schemes does Tamil Nadu government offer farmers?",
            "What is the English meaning of SIP?",
            "Is Hindi Diwas a bank holiday?",
        ] {
            let d = LanguageDetector::detect(question);
            assert!(!d.explicit, "{:?} is not a language request", question);
            assert_eq!(d.language, Language::English);
            assert_eq!(d.question, question);
        }
    }

    #[test]
    fn test_request_forms() {
        let d = LanguageDetector::detect("Please reply in Marathi what is NPS");
        assert_eq!(d.language, Language::Marathi);
        assert_eq!(d.question, "what is NPS");

        let d = LanguageDetector::detect("explain SIP in tamil language for beginners");
        assert_eq!(d.language, Language::Tamil);
        assert_eq!(d.question, "explain SIP for beginners");

        let d = LanguageDetector::detect("Explain PPF in Bengali.");
        assert_eq!(d.question, "Explain PPF.");
    }

    #[test]
    fn test_english_homographs_stay_english() {
        assert_eq!(
            LanguageDetector::detect("Is a mere 5 percent FD return good?").language,
            Language::English
        );
        assert_eq!(
            LanguageDetector::detect("I hum while investing, what is SIP?").language,
            Language::English
        );
    }
}
