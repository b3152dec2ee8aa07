//! LLM assessment client
//!
//! Enhances deterministic quality metrics with a model-generated
//! narrative. One consolidated call per module, behind a filesystem
//! response cache, a retry/backoff loop for transient failures, and a
//! multi-strategy JSON recovery parser for malformed responses.
//!
//! The error surface is deliberately narrow: `LlmError` is raised only
//! for retry-exhausted or non-retryable service failures. A response
//! that cannot be parsed is not an error — recovery terminates in an
//! empty mapping and callers treat that as "assessment unavailable".

mod cache;
mod client;
mod enhancer;
mod prompts;
mod recovery;

pub use cache::ResponseCache;
pub use client::{LlmBackend, LlmClient, Message, Role, TextGenerator};
pub use enhancer::{fallback_assessment, QualityEnhancer};
pub use prompts::build_consolidated_prompt;
pub use recovery::parse_with_recovery;

use thiserror::Error;

/// Errors from the LLM client
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Missing API key: {env_var} not set")]
    MissingApiKey { env_var: String },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse API response: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<LlmError>,
    },
}

impl LlmError {
    /// Whether this error indicates a transient condition worth retrying:
    /// rate limiting, 5xx, timeouts, or service-unavailable responses.
    /// Auth and malformed-request errors are permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Api { status, message } => {
                if *status == 429 || (500..=599).contains(status) {
                    return true;
                }
                let lower = message.to_lowercase();
                lower.contains("rate limit")
                    || lower.contains("rate_limit")
                    || lower.contains("timeout")
                    || lower.contains("timed out")
                    || lower.contains("unavailable")
                    || lower.contains("overloaded")
            }
            _ => false,
        }
    }
}

pub type LlmResult<T> = Result<T, LlmError>;
