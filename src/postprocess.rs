//! Response clean-up
//!
//! Best-effort pipeline of independent text transforms applied to the model's
//! reply: strip meta-commentary (word counts, translation notes), then tidy
//! whitespace. No transform depends on another having run.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

/// Trait for clean-up steps
pub trait ResponseTransform: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, text: &str) -> String;
}

/// Replace every match of a pattern
pub struct PatternStrip {
    name: &'static str,
    pattern: &'static Regex,
    replacement: &'static str,
}

impl ResponseTransform for PatternStrip {
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

lazy_static! {
    // "(250 words)", "(~300 words)", "(Word count: 412)"; a bare "(150000)" is content
    static ref WORD_COUNT_INLINE: Regex = Regex::new(
        r"(?i)\(\s*(?:word\s*count\s*[:\-]?\s*(?:approx(?:imately|\.)?\s*|~\s*)?\d+(?:\s*words?)?|(?:approx(?:imately|\.)?\s*|~\s*)?\d+\s*words?)\s*\)"
    )
    .expect("valid word count pattern");

    // A line that is only "Word count: 250"
    static ref WORD_COUNT_LINE: Regex = Regex::new(
        r"(?im)^[ \t]*[*_]*word\s*count[*_]*\s*[:\-]\s*~?\d+[^\n]*$"
    )
    .expect("valid word count line pattern");

    // "(Translated from English)", "(Note: this is a translation ...)"
    static ref TRANSLATION_INLINE: Regex = Regex::new(
        r"(?i)\([^()\n]*\btranslat\w*[^()\n]*\)"
    )
    .expect("valid translation pattern");

    // "Note: This answer has been translated ..." / "This response is in Hindi as requested."
    static ref TRANSLATION_LINE: Regex = Regex::new(
        r"(?im)^[ \t]*[*_]*(?:note|disclaimer)[*_]*\s*:[^\n]*\b(?:translat\w*|as requested)\b[^\n]*$|^[ \t]*[*_]*this (?:response|answer|reply) (?:is|has been) (?:written |provided |given )?(?:in|translated)\b[^\n]*$"
    )
    .expect("valid translation line pattern");

    static ref TRAILING_SPACE: Regex = Regex::new(r"(?m)[ \t]+$").expect("valid trailing space pattern");

    // Three or more newlines (two or more blank lines) become one blank line
    static ref EXCESS_BLANK_LINES: Regex = Regex::new(r"\n{3,}").expect("valid blank line pattern");
}

/// Ordered set of transforms
pub struct ResponseCleaner {
    transforms: Vec<Box<dyn ResponseTransform>>,
}

impl ResponseCleaner {
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    pub fn add_transform(&mut self, transform: Box<dyn ResponseTransform>) {
        self.transforms.push(transform);
    }

    pub fn clean(&self, text: &str) -> String {
        let mut current = text.replace("\r\n", "\n");

        for transform in &self.transforms {
            let next = transform.apply(&current);
            if next != current {
                debug!(transform = transform.name(), "Response transform applied");
            }
            current = next;
        }

        current.trim().to_string()
    }
}

impl Default for ResponseCleaner {
    fn default() -> Self {
        Self::new()
    }
}

/// Meta-commentary stripping followed by whitespace normalization
pub fn create_default_cleaner() -> ResponseCleaner {
    let mut cleaner = ResponseCleaner::new();

    let steps: [(&'static str, &'static Regex, &'static str); 6] = [
        ("word_count_line", &*WORD_COUNT_LINE, ""),
        ("word_count_inline", &*WORD_COUNT_INLINE, ""),
        ("translation_line", &*TRANSLATION_LINE, ""),
        ("translation_inline", &*TRANSLATION_INLINE, ""),
        ("trailing_space", &*TRAILING_SPACE, ""),
        ("excess_blank_lines", &*EXCESS_BLANK_LINES, "\n\n"),
    ];

    for (name, pattern, replacement) in steps {
        cleaner.add_transform(Box::new(PatternStrip {
            name,
            pattern,
            replacement,
        }));
    }

    cleaner
}
