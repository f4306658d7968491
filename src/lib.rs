//! Financial Literacy Assistant
//!
//! An HTTP question-answering service scoped to Indian financial literacy:
//! - Greets users and answers with a practical finance tip
//! - Declines off-topic questions without calling the model
//! - Answers in the language the user wrote in (or explicitly asked for)
//! - Cleans model meta-commentary before replying
//!
//! REQUEST FLOW:
//! PROMPT → GATE (greeting? relevant?) → PROMPT BUILD → MODEL → CLEAN → ANSWER

pub mod api;
pub mod assistant;
pub mod classifier;
pub mod config;
pub mod error;
pub mod gateway;
pub mod language;
pub mod models;
pub mod postprocess;
pub mod prompt;
pub mod text;

pub use error::Result;

// Re-export common types
pub use assistant::FinanceAssistant;
pub use config::AppConfig;
pub use models::*;
