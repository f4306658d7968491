//! Text primitives shared by the classifiers
//!
//! - Normalization: lowercase, drop punctuation, split on whitespace
//! - Ratcliff/Obershelp sequence-matcher ratio (2·M / T)
//! - Indic script detection by Unicode block

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Unicode-aware `\w` covers Indic letters, vowel signs, viramas and joiners;
    /// dandas and other script punctuation are dropped like ASCII punctuation.
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").expect("valid normalizer pattern");
}

/// Lowercased, punctuation-free text plus its whitespace tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// Tokens re-joined with single spaces
    pub text: String,
    pub tokens: Vec<String>,
}

impl NormalizedText {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

/// Normalize raw user input. Never fails; empty input yields no tokens.
pub fn normalize(raw: &str) -> NormalizedText {
    let lowered = raw.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");

    let tokens: Vec<String> = stripped.split_whitespace().map(str::to_string).collect();

    NormalizedText {
        text: tokens.join(" "),
        tokens,
    }
}

/// Sequence-matcher ratio: twice the matched characters over the combined length.
///
/// 1.0 for identical strings, 0.0 when nothing lines up.
pub fn similarity(a: &str, b: &str) -> f32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    (2 * matched_chars(&a, &b)) as f32 / total as f32
}

/// Characters covered by the matching blocks: take the longest common run,
/// then recurse on the pieces to its left and right.
pub fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        total += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    total
}

/// Longest common run of `a[alo..ahi]` and `b[blo..bhi]`.
/// Ties go to the run that starts first in `a`, then first in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let width = bhi - blo;
    let mut best = (alo, blo, 0);
    // run length ending at (i - 1, j - 1), indexed by j - blo + 1
    let mut prev = vec![0usize; width + 1];

    for i in alo..ahi {
        let mut current = vec![0usize; width + 1];
        for j in blo..bhi {
            if a[i] == b[j] {
                let size = prev[j - blo] + 1;
                current[j - blo + 1] = size;
                if size > best.2 {
                    best = (i + 1 - size, j + 1 - size, size);
                }
            }
        }
        prev = current;
    }

    best
}

/// Indian scripts recognised by block range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicScript {
    Devanagari,
    Bengali,
    Gurmukhi,
    Gujarati,
    Oriya,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
}

const INDIC_BLOCKS: &[(char, char, IndicScript)] = &[
    ('\u{0900}', '\u{097F}', IndicScript::Devanagari),
    ('\u{0980}', '\u{09FF}', IndicScript::Bengali),
    ('\u{0A00}', '\u{0A7F}', IndicScript::Gurmukhi),
    ('\u{0A80}', '\u{0AFF}', IndicScript::Gujarati),
    ('\u{0B00}', '\u{0B7F}', IndicScript::Oriya),
    ('\u{0B80}', '\u{0BFF}', IndicScript::Tamil),
    ('\u{0C00}', '\u{0C7F}', IndicScript::Telugu),
    ('\u{0C80}', '\u{0CFF}', IndicScript::Kannada),
    ('\u{0D00}', '\u{0D7F}', IndicScript::Malayalam),
];

pub fn indic_script_of(c: char) -> Option<IndicScript> {
    INDIC_BLOCKS
        .iter()
        .find(|(start, end, _)| (*start..=*end).contains(&c))
        .map(|(_, _, script)| *script)
}

pub fn contains_indic_script(text: &str) -> bool {
    text.chars().any(|c| indic_script_of(c).is_some())
}

/// Distinct Indic scripts in order of first appearance
pub fn indic_scripts(text: &str) -> Vec<IndicScript> {
    let mut found = Vec::new();
    for script in text.chars().filter_map(indic_script_of) {
        if !found.contains(&script) {
            found.push(script);
        }
    }
    found
}
