//! Error types for the financial literacy assistant

use std::time::Duration;
use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, AssistantError>;

#[derive(Error, Debug)]
pub enum AssistantError {

    // =============================
    // Request Errors
    // =============================

    #[error("{0}")]
    Validation(String),

    // =============================
    // Startup Errors
    // =============================

    #[error("Configuration error: {0}")]
    Config(String),

    // =============================
    // Model Provider Errors
    // =============================

    #[error("Model request timed out after {}s", .0.as_secs())]
    ProviderTimeout(Duration),

    #[error("Model transport error: {0}")]
    ProviderTransport(String),

    #[error("Model provider returned {status}: {body}")]
    ProviderStatus { status: u16, body: String },

    #[error("Malformed model reply: {0}")]
    ProviderMalformedReply(String),

    #[error("Model returned an empty response")]
    EmptyResponse,

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AssistantError {
    /// True for failures of the outbound model call (as opposed to caller or startup errors).
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            AssistantError::ProviderTimeout(_)
                | AssistantError::ProviderTransport(_)
                | AssistantError::ProviderStatus { .. }
                | AssistantError::ProviderMalformedReply(_)
                | AssistantError::EmptyResponse
        )
    }
}
