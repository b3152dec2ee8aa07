//! User-level configuration for critiq
//!
//! Supports loading config from:
//! - Environment variables
//! - ~/.config/critiq/config.toml
//!
//! Holds credentials and model preferences that should not live in a
//! repository's `critiq.toml`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UserConfig {
    #[serde(default)]
    pub llm: LlmKeys,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LlmKeys {
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Anthropic API key
    pub anthropic_api_key: Option<String>,

    /// Preferred model, overriding the backend default
    pub model: Option<String>,

    /// Backend: "openai" (default), "anthropic", "ollama"
    pub backend: Option<String>,
}

impl UserConfig {
    /// Load config from all sources, with priority:
    /// 1. Environment variables (highest)
    /// 2. User config (~/.config/critiq/config.toml)
    pub fn load() -> Result<Self> {
        let mut config = UserConfig::default();

        if let Some(user_config) = Self::user_config_path()
            .filter(|p| p.exists())
            .and_then(|p| std::fs::read_to_string(&p).ok())
            .and_then(|content| toml::from_str::<UserConfig>(&content).ok())
        {
            config.merge(user_config);
        }

        // Environment variables override everything
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.llm.openai_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            config.llm.anthropic_api_key = Some(key);
        }
        if let Ok(model) = std::env::var("CRITIQ_MODEL") {
            config.llm.model = Some(model);
        }

        Ok(config)
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("critiq").join("config.toml"))
    }

    /// Merge another config into this one (other takes priority)
    fn merge(&mut self, other: UserConfig) {
        if other.llm.openai_api_key.is_some() {
            self.llm.openai_api_key = other.llm.openai_api_key;
        }
        if other.llm.anthropic_api_key.is_some() {
            self.llm.anthropic_api_key = other.llm.anthropic_api_key;
        }
        if other.llm.model.is_some() {
            self.llm.model = other.llm.model;
        }
        if other.llm.backend.is_some() {
            self.llm.backend = other.llm.backend;
        }
    }

    /// API key for the named backend, if configured. Ollama needs none.
    pub fn api_key_for(&self, backend: &str) -> Option<&str> {
        match backend {
            "openai" => self.llm.openai_api_key.as_deref(),
            "anthropic" => self.llm.anthropic_api_key.as_deref(),
            "ollama" => Some("ollama"),
            _ => None,
        }
    }

    /// Whether any credential is configured
    pub fn has_llm_key(&self) -> bool {
        self.llm.openai_api_key.is_some() || self.llm.anthropic_api_key.is_some()
    }
}
