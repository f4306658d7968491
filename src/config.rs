//! Process-wide configuration
//!
//! Read once at startup from the environment (a `.env` file is honoured).
//! A missing API key is fatal: the server refuses to start without it.

use crate::error::AssistantError;
use crate::Result;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which relevance check guards the generation call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelevanceMode {
    /// Fuzzy keyword matching, regex heuristics and script detection
    Local,
    /// Ask the model itself for a structured relevance decision
    Model,
}

impl RelevanceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelevanceMode::Local => "local",
            RelevanceMode::Model => "model",
        }
    }
}

impl fmt::Display for RelevanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelevanceMode {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" | "keywords" | "fuzzy" => Ok(RelevanceMode::Local),
            "model" | "llm" | "ai" => Ok(RelevanceMode::Model),
            other => Err(AssistantError::Config(format!(
                "unknown RELEVANCE_STRATEGY '{}' (expected 'local' or 'model')",
                other
            ))),
        }
    }
}

/// Model provider settings
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub relevance: RelevanceMode,
    pub model: ModelConfig,
}

impl AppConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("GEMINI_API_KEY").ok_or_else(|| {
            AssistantError::Config("GEMINI_API_KEY is not set. Add it to .env".to_string())
        })?;

        let port = match get("PORT").or_else(|| get("API_PORT")) {
            Some(raw) => parse_value::<u16>("PORT", &raw)?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get("MODEL_TIMEOUT_SECS") {
            Some(raw) => parse_value::<u64>("MODEL_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(AssistantError::Config(
                "MODEL_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        let relevance = match get("RELEVANCE_STRATEGY") {
            Some(raw) => raw.parse()?,
            None => RelevanceMode::Local,
        };

        let temperature = match get("MODEL_TEMPERATURE") {
            Some(raw) => parse_value::<f32>("MODEL_TEMPERATURE", &raw)?,
            None => 0.4,
        };

        let max_tokens = match get("MODEL_MAX_TOKENS") {
            Some(raw) => parse_value::<u32>("MODEL_MAX_TOKENS", &raw)?,
            None => 2048,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            relevance,
            model: ModelConfig {
                api_key,
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: get("GEMINI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                timeout: Duration::from_secs(timeout_secs),
                temperature,
                max_tokens,
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.parse::<T>()
        .map_err(|_| AssistantError::Config(format!("invalid value for {}: '{}'", key, raw)))
}
