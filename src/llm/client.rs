//! HTTP client for LLM backends
//!
//! Supports OpenAI-compatible endpoints and Anthropic. Uses ureq (sync
//! HTTP) — the pipeline is single-threaded and the LLM call is the only
//! blocking operation, so no async runtime is needed.

use crate::config::UserConfig;
use crate::llm::{LlmError, LlmResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed per-request timeout, independent of the retry/backoff loop.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Supported LLM backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmBackend {
    #[default]
    OpenAi,
    Anthropic,
    Ollama,
}

impl LlmBackend {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "openai" => Some(LlmBackend::OpenAi),
            "anthropic" => Some(LlmBackend::Anthropic),
            "ollama" => Some(LlmBackend::Ollama),
            _ => None,
        }
    }

    pub fn env_key(&self) -> &'static str {
        match self {
            LlmBackend::OpenAi => "OPENAI_API_KEY",
            LlmBackend::Anthropic => "ANTHROPIC_API_KEY",
            LlmBackend::Ollama => "OLLAMA_MODEL",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmBackend::OpenAi => "gpt-4o-mini",
            LlmBackend::Anthropic => "claude-sonnet-4-20250514",
            LlmBackend::Ollama => "deepseek-coder:6.7b",
        }
    }

    pub fn api_url(&self) -> &'static str {
        match self {
            LlmBackend::OpenAi => "https://api.openai.com/v1/chat/completions",
            LlmBackend::Anthropic => "https://api.anthropic.com/v1/messages",
            LlmBackend::Ollama => "http://localhost:11434/v1/chat/completions",
        }
    }

    pub fn is_openai_compatible(&self) -> bool {
        matches!(self, LlmBackend::OpenAi | LlmBackend::Ollama)
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LlmBackend::Ollama)
    }

    pub fn name(&self) -> &'static str {
        match self {
            LlmBackend::OpenAi => "openai",
            LlmBackend::Anthropic => "anthropic",
            LlmBackend::Ollama => "ollama",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Seam between the enhancer and the network. The production
/// implementation is `LlmClient`; tests substitute counting mocks.
pub trait TextGenerator {
    /// Model identifier, used for cache keys and report metadata
    fn model(&self) -> &str;

    /// One synchronous completion call
    fn generate(&self, system: &str, prompt: &str) -> LlmResult<String>;
}

/// Unified LLM client — sync HTTP via ureq
pub struct LlmClient {
    backend: LlmBackend,
    model: String,
    max_tokens: u32,
    temperature: f32,
    api_key: String,
    agent: ureq::Agent,
}

fn make_agent() -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // We map status codes to LlmError ourselves
        .timeout_global(Some(REQUEST_TIMEOUT))
        .build()
        .new_agent()
}

impl LlmClient {
    pub fn new(backend: LlmBackend, model: Option<String>, api_key: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.unwrap_or_else(|| backend.default_model().to_string()),
            max_tokens: 1_000,
            temperature: 0.3,
            api_key: api_key.into(),
            agent: make_agent(),
        }
    }

    /// Build a client from the user config (keys from env or
    /// ~/.config/critiq/config.toml). Ollama needs no key.
    pub fn from_user_config(
        backend: LlmBackend,
        model: Option<String>,
        user: &UserConfig,
    ) -> LlmResult<Self> {
        let api_key = user
            .api_key_for(backend.name())
            .ok_or_else(|| LlmError::MissingApiKey {
                env_var: backend.env_key().to_string(),
            })?;
        Ok(Self::new(backend, model, api_key))
    }

    pub fn backend(&self) -> LlmBackend {
        self.backend
    }

    fn generate_openai(&self, system: &str, prompt: &str) -> LlmResult<String> {
        let body = OpenAiRequest {
            model: self.model.clone(),
            messages: vec![Message::system(system), Message::user(prompt)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let mut req = self
            .agent
            .post(self.backend.api_url())
            .header("Content-Type", "application/json");

        if self.backend.requires_api_key() {
            req = req.header("Authorization", &format!("Bearer {}", self.api_key));
        }

        let response = req.send_json(&body).map_err(|e| LlmError::Api {
            status: 0,
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.into_body().read_to_string().unwrap_or_default();
            return Err(LlmError::Api { status, message });
        }

        let resp: OpenAiResponse = response
            .into_body()
            .read_json()
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        resp.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::Parse("No response choices".to_string()))
    }

    fn generate_anthropic(&self, system: &str, prompt: &str) -> LlmResult<String> {
        let body = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![Message::user(prompt)],
            system: Some(system.to_string()),
            temperature: Some(self.temperature),
        };

        let response = self
            .agent
            .post(self.backend.api_url())
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .send_json(&body)
            .map_err(|e| LlmError::Api {
                status: 0,
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.into_body().read_to_string().unwrap_or_default();
            return Err(LlmError::Api { status, message });
        }

        let resp: AnthropicResponse = response
            .into_body()
            .read_json()
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        resp.content
            .into_iter()
            .find(|c| c.content_type == "text")
            .map(|c| c.text)
            .ok_or_else(|| LlmError::Parse("No text content in response".to_string()))
    }
}

impl TextGenerator for LlmClient {
    fn model(&self) -> &str {
        &self.model
    }

    fn generate(&self, system: &str, prompt: &str) -> LlmResult<String> {
        if self.backend.is_openai_compatible() {
            self.generate_openai(system, prompt)
        } else {
            self.generate_anthropic(system, prompt)
        }
    }
}

// OpenAI API types
#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: String,
}

// Anthropic API types
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Deserialize)]
struct AnthropicContent {
    #[serde(rename = "type")]
    content_type: String,
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse() {
        assert_eq!(LlmBackend::parse("openai"), Some(LlmBackend::OpenAi));
        assert_eq!(LlmBackend::parse("Anthropic"), Some(LlmBackend::Anthropic));
        assert_eq!(LlmBackend::parse("ollama"), Some(LlmBackend::Ollama));
        assert_eq!(LlmBackend::parse("cohere"), None);
    }

    #[test]
    fn test_backend_defaults() {
        assert_eq!(LlmBackend::OpenAi.default_model(), "gpt-4o-mini");
        assert!(LlmBackend::OpenAi.requires_api_key());
        assert!(!LlmBackend::Ollama.requires_api_key());
    }

    #[test]
    fn test_client_model_fallback() {
        let client = LlmClient::new(LlmBackend::OpenAi, None, "sk-test");
        assert_eq!(client.model(), "gpt-4o-mini");

        let client = LlmClient::new(LlmBackend::OpenAi, Some("custom".to_string()), "sk-test");
        assert_eq!(client.model(), "custom");
    }

    #[test]
    fn test_missing_key_is_error() {
        let user = UserConfig::default();
        let result = LlmClient::from_user_config(LlmBackend::OpenAi, None, &user);
        assert!(matches!(result, Err(LlmError::MissingApiKey { .. })));
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let user = UserConfig::default();
        let result = LlmClient::from_user_config(LlmBackend::Ollama, None, &user);
        assert!(result.is_ok());
    }
}
