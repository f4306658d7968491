//! Local relevance strategy
//!
//! Accepts a message when any of these hold:
//! - it contains Indic script (assumed in-domain, see `with_indic_passthrough`)
//! - a token is a finance keyword, or a plausible typo of one (length-dependent
//!   ratio threshold, same first letter, at most one or two characters off)
//! - it matches a question-about-money, government-scheme, or amount pattern

use super::RelevanceStrategy;
use crate::models::RelevanceVerdict;
use crate::text::{self, similarity, NormalizedText};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

/// Canonical finance vocabulary, single normalized words
const FINANCE_KEYWORDS: &[&str] = &[
    // Schemes & government
    "scheme", "schemes", "yojana", "yojna", "subsidy", "government", "benefit", "pension",
    "kisan", "mudra", "sukanya", "samriddhi", "aadhaar",
    // Personal finance basics
    "finance", "financial", "budget", "budgeting", "saving", "savings", "money", "rupee",
    "rupees", "salary", "income", "expense", "expenses", "retirement", "inflation",
    // Investing
    "invest", "investing", "investment", "mutual", "fund", "funds", "stock", "stocks", "share",
    "shares", "equity", "bond", "bonds", "gold", "dividend", "portfolio", "nifty", "sensex",
    // Banking & credit
    "bank", "banking", "rbi", "interest", "deposit", "loan", "loans", "credit", "debit",
    "mortgage", "debt", "lending", "borrow", "repayment", "cibil", "emi", "upi", "kyc",
    // Tax
    "tax", "taxes", "taxation", "gst", "itr",
    // Insurance & retirement accounts
    "insurance", "premium", "pf", "epf", "ppf", "nps", "sip", "fd", "rd",
];

/// Tokens of two characters or fewer are ignored unless listed here
const SHORT_FINANCE_TERMS: &[&str] = &["pf", "fd", "rd"];

/// Everyday words that would otherwise pass as typos of a keyword
/// ("stick" for "stock", "sharp" for "share")
const COMMON_WORDS: &[&str] = &[
    "best", "black", "bonus", "bound", "explain", "found", "monkey", "play", "prime", "sense",
    "shape", "sharp", "shore", "stick", "time",
];

/// Shorter tokens and keywords only ever match exactly
const MIN_FUZZY_TOKEN_CHARS: usize = 4;
const MIN_FUZZY_KEYWORD_CHARS: usize = 5;

lazy_static! {
    static ref QUESTION_ABOUT_MONEY: Regex = Regex::new(
        r"\b(how|what|where|which|why|when|should|can|best)\b.*\b(money|invest\w*|save|saving|savings|loans?|tax\w*|rupees?|rs|inr|interest|returns?|emi|salary|income|budget\w*)\b"
    )
    .expect("valid money question pattern");
    static ref GOVERNMENT_SCHEME: Regex = Regex::new(
        r"\b(pm|pradhan mantri|government|govt|sarkari|central|state)\b.*\b(schemes?|yojanas?|yojna|benefits?|subsid(y|ies))\b|\b\w+ (scheme|yojana|yojna)\b"
    )
    .expect("valid scheme pattern");
    static ref AMOUNT_WITH_UNIT: Regex = Regex::new(
        r"\b\d+\s*(rs|rupees?|inr|lakhs?|lacs?|crores?|cr|k|thousand|percent)\b|\b(rs|inr)\s*\d+"
    )
    .expect("valid amount pattern");
}

/// Similarity a token must reach, by token length in characters
fn threshold_for(len: usize) -> f32 {
    match len {
        0..=3 => 0.7,
        4..=5 => 0.6,
        _ => 0.55,
    }
}

/// Characters of the longer word that may stay unmatched in a typo
fn unmatched_allowance(longest: usize) -> usize {
    if longest <= 7 {
        1
    } else {
        2
    }
}

/// Misspelling check: passes the ratio threshold, starts with the same letter,
/// and leaves at most one or two characters of the longer word unmatched.
fn is_typo_of(token: &str, keyword: &str) -> bool {
    let token_chars: Vec<char> = token.chars().collect();
    let keyword_chars: Vec<char> = keyword.chars().collect();

    if token_chars.len() < MIN_FUZZY_TOKEN_CHARS
        || keyword_chars.len() < MIN_FUZZY_KEYWORD_CHARS
        || token_chars.first() != keyword_chars.first()
    {
        return false;
    }

    if similarity(token, keyword) < threshold_for(token_chars.len()) {
        return false;
    }

    let longest = token_chars.len().max(keyword_chars.len());
    let matched = text::matched_chars(&token_chars, &keyword_chars);
    longest - matched <= unmatched_allowance(longest)
}

pub struct KeywordStrategy {
    indic_passthrough: bool,
}

impl KeywordStrategy {
    pub fn new() -> Self {
        Self {
            indic_passthrough: true,
        }
    }

    /// Any Indic-script message is treated as in-domain by default, which
    /// over-approximates. Pass `false` to classify such messages by keywords
    /// and patterns alone.
    pub fn with_indic_passthrough(mut self, enabled: bool) -> Self {
        self.indic_passthrough = enabled;
        self
    }

    /// First token that is a keyword or a typo of one, with that keyword
    pub fn closest_keyword<'a>(
        &self,
        normalized: &'a NormalizedText,
    ) -> Option<(&'a str, &'static str)> {
        for token in &normalized.tokens {
            let token = token.as_str();
            if token.chars().count() <= 2 && !SHORT_FINANCE_TERMS.contains(&token) {
                continue;
            }

            if let Some(keyword) = FINANCE_KEYWORDS.iter().find(|kw| **kw == token) {
                return Some((token, *keyword));
            }

            if COMMON_WORDS.contains(&token) {
                continue;
            }

            if let Some(keyword) = FINANCE_KEYWORDS.iter().find(|kw| is_typo_of(token, kw)) {
                return Some((token, *keyword));
            }
        }
        None
    }

    pub fn evaluate(&self, raw: &str, normalized: &NormalizedText) -> RelevanceVerdict {
        if self.indic_passthrough && text::contains_indic_script(raw) {
            return RelevanceVerdict::relevant("indic script");
        }

        if let Some((token, keyword)) = self.closest_keyword(normalized) {
            return RelevanceVerdict::relevant(format!("'{}' matches keyword '{}'", token, keyword));
        }

        let patterns: [(&str, &Regex); 3] = [
            ("money question", &*QUESTION_ABOUT_MONEY),
            ("government scheme", &*GOVERNMENT_SCHEME),
            ("amount with unit", &*AMOUNT_WITH_UNIT),
        ];
        for (name, pattern) in patterns {
            if pattern.is_match(&normalized.text) {
                return RelevanceVerdict::relevant(format!("{} pattern", name));
            }
        }

        RelevanceVerdict::off_topic("no keyword, pattern, or script match")
    }
}

impl Default for KeywordStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RelevanceStrategy for KeywordStrategy {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn check(&self, raw: &str, normalized: &NormalizedText) -> RelevanceVerdict {
        self.evaluate(raw, normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::normalize;

    fn relevant(s: &str) -> bool {
        KeywordStrategy::new().evaluate(s, &normalize(s)).is_relevant
    }

    #[test]
    fn test_exact_keywords() {
        assert!(relevant("how do I apply for PM-KISAN scheme"));
        assert!(relevant("Tell me about RBI repo rate"));
        assert!(relevant("PF withdrawal rules"));
    }

    #[test]
    fn test_typos_are_tolerated() {
        assert!(relevant("best way to invst my salry"));
        assert!(relevant("what is mutal fund"));
        assert!(relevant("explain inssurance"));
        assert!(relevant("how to plan for retirment"));
        assert!(relevant("sukanya samriddhi yojanna details"));
    }

    #[test]
    fn test_off_topic() {
        assert!(!relevant("what's the weather today"));
        assert!(!relevant("tell me a joke"));
        assert!(!relevant(""));
    }

    #[test]
    fn test_everyday_questions_declined() {
        let questions = [
            "who won the cricket match yesterday",
            "what is the capital of france",
            "what time is it",
            "play some music",
            "how do I bake a chocolate cake",
            "who is the prime minister of india",
            "recommend a good movie",
            "what is black hole",
            "explain photosynthesis",
            "best restaurants near me",
            "how tall is mount everest",
            "who wrote harry potter",
            "how to lose weight fast",
            "what is the meaning of life",
            "how to learn guitar",
            "how many planets are there",
            "tell me a story",
            "why is the sky blue",
            "how to train my dog",
        ];
        for q in questions {
            assert!(!relevant(q), "{:?} should be declined", q);
        }
    }

    #[test]
    fn test_typo_rules() {
        assert!(is_typo_of("retirment", "retirement"));
        assert!(is_typo_of("goverment", "government"));
        assert!(is_typo_of("expence", "expense"));
        // Different first letter
        assert!(!is_typo_of("time", "income"));
        // Two characters off in a short word
        assert!(!is_typo_of("cricket", "credit"));
        // Short keywords only match exactly
        assert!(!is_typo_of("bake", "bank"));
    }

    #[test]
    fn test_thresholds_by_length() {
        assert_eq!(threshold_for(2), 0.7);
        assert_eq!(threshold_for(3), 0.7);
        assert_eq!(threshold_for(5), 0.6);
        assert_eq!(threshold_for(6), 0.55);
    }

    #[test]
    fn test_short_tokens_need_allow_list() {
        let strategy = KeywordStrategy::new();
        // "fd" is allowed even though it has two characters
        let n = normalize("fd rates");
        assert_eq!(strategy.closest_keyword(&n), Some(("fd", "fd")));
        // "ok" is skipped, "go" too
        assert_eq!(strategy.closest_keyword(&normalize("ok go")), None);
    }

    #[test]
    fn test_patterns() {
        let strategy = KeywordStrategy::new();
        let check = |s: &str| strategy.evaluate(s, &normalize(s));

        let v = check("park 5 lakh");
        assert!(v.is_relevant);
        assert_eq!(v.reason, "amount with unit pattern");

        assert!(AMOUNT_WITH_UNIT.is_match("rs 500 per month"));
        assert!(GOVERNMENT_SCHEME.is_match("is there any central yojanas for farmers"));
        assert!(QUESTION_ABOUT_MONEY.is_match("how can i save"));
        assert!(!QUESTION_ABOUT_MONEY.is_match("whats the weather today"));
    }

    #[test]
    fn test_indic_passthrough() {
        let strategy = KeywordStrategy::new();
        let hindi = "आज मौसम कैसा है";
        let v = strategy.evaluate(hindi, &normalize(hindi));
        assert!(v.is_relevant);
        assert_eq!(v.reason, "indic script");

        let strict = KeywordStrategy::new().with_indic_passthrough(false);
        assert!(!strict.evaluate(hindi, &normalize(hindi)).is_relevant);
    }
}
