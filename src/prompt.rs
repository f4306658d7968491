//! Prompt Builder
//!
//! Instruction block, in order: language, typo tolerance, domain scope,
//! formatting. The user's question follows untouched apart from language-name
//! stripping and, for greetings, a tip request.

use crate::models::{Language, PromptSpec};

const TYPO_DIRECTIVE: &str = "The user may misspell financial terms (for example \"invst\", \"mutal fund\", \"inssurance\"). \
Silently interpret the most likely intended term and answer that. Never point out or correct the spelling.";

const DOMAIN_DIRECTIVE: &str = "You must answer ONLY in the context of Indian financial literacy: \
government schemes, RBI rules and guidelines, taxation, loans, insurance, investment options \
(PPF, NPS, mutual funds, SIPs, fixed deposits, gold, stocks), and budgeting and saving. \
Include relevant government schemes, tax or loan implications, and practical next steps when useful.";

const FORMAT_DIRECTIVE: &str = "FORMAT INSTRUCTIONS (follow exactly):
1. Use `###` for section headings.
2. Add ONE completely blank line after every heading.
3. Add ONE completely blank line between every paragraph and list.
4. Use bullet lists for steps, benefits, features, and risks.
5. Bold important terms using **bold**.
6. Keep paragraphs short: at most two or three sentences each.
7. Do not add word counts, translation notes, or remarks about these instructions.";

const GREETING_TIP: &str = "(The user is greeting you. Reply warmly in one or two lines, \
then share one simple, practical personal-finance tip for someone in India.)";

#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, question: &str, language: Language, greeting: bool) -> PromptSpec {
        let instructions = [
            language_directive(language),
            TYPO_DIRECTIVE.to_string(),
            DOMAIN_DIRECTIVE.to_string(),
            FORMAT_DIRECTIVE.to_string(),
        ]
        .join("\n\n");

        let question = if greeting {
            format!("{}\n\n{}", question, GREETING_TIP)
        } else {
            question.to_string()
        };

        PromptSpec {
            instructions,
            question,
        }
    }
}

fn language_directive(language: Language) -> String {
    match language {
        Language::Regional => "LANGUAGE: Respond entirely in the same Indian language and script \
the user wrote in. Never mix languages and never switch to English midway."
            .to_string(),
        Language::English => "LANGUAGE: Respond entirely in English. Never mix languages.".to_string(),
        other => format!(
            "LANGUAGE: Respond entirely in {name}, using its native script. \
Never mix languages and never switch to English midway; keep only unavoidable \
acronyms such as PPF or GST in Latin letters.",
            name = other.display_name()
        ),
    }
}
