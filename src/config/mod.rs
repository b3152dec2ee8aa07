//! Configuration for critiq
//!
//! All tunables live in an explicit, immutable `QualityConfig` threaded
//! through component constructors. Loaded from `critiq.toml` when present;
//! every field has a documented default so an empty or missing file works.

mod user_config;

pub use user_config::UserConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Per-metric weights used when combining scores into an overall score.
///
/// Defaults sum to 1.0; the aggregator normalizes by the weight sum so
/// custom weights need not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricWeights {
    pub complexity: f64,
    pub documentation: f64,
    pub maintainability: f64,
    pub testability: f64,
    pub design_patterns: f64,
    pub code_style: f64,
    pub security: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            complexity: 0.20,
            documentation: 0.15,
            maintainability: 0.20,
            testability: 0.15,
            design_patterns: 0.10,
            code_style: 0.10,
            security: 0.10,
        }
    }
}

/// Score thresholds for the discrete quality levels.
///
/// Evaluated top-down (excellent first), closed on the lower bound:
/// a score of exactly `excellent` classifies as excellent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelThresholds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
    pub poor: f64,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            excellent: 0.85,
            good: 0.70,
            fair: 0.55,
            poor: 0.40,
        }
    }
}

/// LLM integration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Master switch; false forces the deterministic fallback everywhere
    pub enabled: bool,
    /// Backend name: "openai", "anthropic", or "ollama"
    pub backend: String,
    /// Model identifier; None uses the backend default
    pub model: Option<String>,
    /// Hard cap on the module-content preview embedded in prompts
    pub content_preview_chars: usize,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: "openai".to_string(),
            model: None,
            content_preview_chars: 2_000,
        }
    }
}

/// Filesystem response-cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    /// Cache directory; one `<digest>.json` file per entry
    pub dir: PathBuf,
    /// Entries older than this are deleted on read and treated as misses
    pub ttl_hours: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from(".critiq/llm_cache"),
            ttl_hours: 24,
        }
    }
}

/// Retry policy for transient LLM service errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    /// Exponential backoff base: sleep `base_delay_secs * 2^attempt`
    pub base_delay_secs: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_secs: 2.0,
        }
    }
}

/// Root configuration object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    pub weights: MetricWeights,
    pub thresholds: LevelThresholds,
    pub llm: LlmSettings,
    pub cache: CacheSettings,
    pub retry: RetrySettings,
}

impl QualityConfig {
    /// Load from a `critiq.toml` at the given path. A missing file yields
    /// the defaults; a malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Load from `<repo>/critiq.toml`.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load(&dir.join("critiq.toml"))
    }

    /// Example config written by `critiq init`.
    pub fn example_toml() -> &'static str {
        r#"# critiq configuration

[weights]
# Per-metric contribution to the overall score (normalized by their sum)
# complexity = 0.20
# documentation = 0.15
# maintainability = 0.20
# testability = 0.15
# design_patterns = 0.10
# code_style = 0.10
# security = 0.10

[thresholds]
# Lower bounds for each quality level (closed: 0.85 is "excellent")
# excellent = 0.85
# good = 0.70
# fair = 0.55
# poor = 0.40

[llm]
# enabled = true
# backend = "openai"   # "openai", "anthropic", or "ollama"
# model = "gpt-4o-mini"
# content_preview_chars = 2000

[cache]
# enabled = true
# dir = ".critiq/llm_cache"
# ttl_hours = 24

[retry]
# max_retries = 3
# base_delay_secs = 2.0
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = MetricWeights::default();
        let sum = w.complexity
            + w.documentation
            + w.maintainability
            + w.testability
            + w.design_patterns
            + w.code_style
            + w.security;
        assert!((sum - 1.0).abs() < 1e-9, "weights sum to {}", sum);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = QualityConfig::load(Path::new("/nonexistent/critiq.toml")).unwrap();
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.cache.ttl_hours, 24);
        assert!(config.llm.enabled);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: QualityConfig = toml::from_str(
            r#"
[llm]
enabled = false
backend = "anthropic"

[retry]
max_retries = 5
"#,
        )
        .unwrap();
        assert!(!config.llm.enabled);
        assert_eq!(config.llm.backend, "anthropic");
        assert_eq!(config.retry.max_retries, 5);
        // Untouched sections keep defaults
        assert_eq!(config.thresholds.excellent, 0.85);
        assert_eq!(config.weights.complexity, 0.20);
    }

    #[test]
    fn test_example_toml_parses() {
        let config: QualityConfig = toml::from_str(QualityConfig::example_toml()).unwrap();
        assert!(config.llm.enabled);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(toml::from_str::<QualityConfig>("not [[ valid {{{").is_err());
    }
}
