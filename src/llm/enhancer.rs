//! Quality assessment enhancement
//!
//! Orchestrates the per-module LLM call: cache lookup, retry with
//! exponential backoff for transient failures, recovery parsing, and
//! required-key validation. When the LLM is disabled, or a response
//! survives parsing but lacks the required shape, a deterministic
//! fallback is synthesized from the already-computed metric scores so
//! the pipeline always yields a complete, well-shaped result.

use crate::config::RetrySettings;
use crate::llm::prompts::{build_consolidated_prompt, SYSTEM_PROMPT};
use crate::llm::recovery::parse_with_recovery;
use crate::llm::{LlmError, LlmResult, ResponseCache, TextGenerator};
use crate::models::{now_iso8601, QualityMetric};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Keys every usable narrative assessment must carry.
const REQUIRED_KEYS: [&str; 4] = [
    "overall_assessment",
    "strengths",
    "weaknesses",
    "improvement_priority",
];

/// Per-module LLM enhancement with cache, retry, and fallback.
pub struct QualityEnhancer {
    generator: Option<Box<dyn TextGenerator>>,
    cache: Option<ResponseCache>,
    retry: RetrySettings,
    preview_chars: usize,
}

impl QualityEnhancer {
    pub fn new(
        generator: Box<dyn TextGenerator>,
        cache: Option<ResponseCache>,
        retry: RetrySettings,
        preview_chars: usize,
    ) -> Self {
        Self {
            generator: Some(generator),
            cache,
            retry,
            preview_chars,
        }
    }

    /// An enhancer that never calls out: every request takes the
    /// deterministic fallback path.
    pub fn disabled() -> Self {
        Self {
            generator: None,
            cache: None,
            retry: RetrySettings::default(),
            preview_chars: 2_000,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.generator.is_some()
    }

    pub fn model(&self) -> &str {
        self.generator
            .as_ref()
            .map(|g| g.model())
            .unwrap_or("none")
    }

    /// Produce the narrative assessment for one module.
    ///
    /// Errors only on retry-exhausted or non-retryable service failures;
    /// a malformed response degrades to the fallback instead.
    pub fn enhance_assessment(
        &self,
        module_path: &str,
        metrics: &BTreeMap<String, QualityMetric>,
        content: &str,
        arch_context: &str,
    ) -> LlmResult<Map<String, Value>> {
        let Some(generator) = &self.generator else {
            debug!("LLM disabled; using fallback assessment for {}", module_path);
            return Ok(fallback_assessment(metrics));
        };

        let prompt = build_consolidated_prompt(
            module_path,
            metrics,
            content,
            arch_context,
            self.preview_chars,
        );
        let key = ResponseCache::key(generator.model(), &prompt);

        let response = match self.cache.as_ref().and_then(|c| c.get(&key)) {
            Some(cached) => {
                info!("cache hit for {} ({}...)", module_path, &key[..8]);
                cached
            }
            None => {
                let fresh = self.call_with_retry(generator.as_ref(), &prompt)?;
                if let Some(cache) = &self.cache {
                    cache.put(&key, generator.model(), &fresh);
                }
                fresh
            }
        };

        let mut parsed = parse_with_recovery(&response);

        if !REQUIRED_KEYS.iter().all(|k| parsed.contains_key(*k)) {
            warn!(
                "LLM response for {} missing required keys; using fallback",
                module_path
            );
            return Ok(fallback_assessment(metrics));
        }

        parsed.insert(
            "llm_metadata".to_string(),
            json!({
                "model_used": generator.model(),
                "analysis_timestamp": now_iso8601(),
                "content_analyzed": !content.is_empty(),
            }),
        );
        Ok(parsed)
    }

    /// Call the service, retrying transient failures with exponential
    /// backoff (`base_delay * 2^attempt`). Non-retryable errors surface
    /// immediately; exhaustion wraps the last error.
    fn call_with_retry(&self, generator: &dyn TextGenerator, prompt: &str) -> LlmResult<String> {
        let mut attempt: u32 = 0;
        loop {
            match generator.generate(SYSTEM_PROMPT, prompt) {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < self.retry.max_retries => {
                    let delay = self.retry.base_delay_secs * f64::powi(2.0, attempt as i32);
                    warn!(
                        "transient LLM error (attempt {}/{}), retrying in {:.1}s: {}",
                        attempt + 1,
                        self.retry.max_retries,
                        delay,
                        e
                    );
                    std::thread::sleep(Duration::from_secs_f64(delay.max(0.0)));
                    attempt += 1;
                }
                Err(e) if e.is_retryable() => {
                    return Err(LlmError::RetriesExhausted {
                        attempts: attempt + 1,
                        source: Box::new(e),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Deterministic assessment derived purely from metric scores. Same
/// shape as the LLM result so downstream consumers never branch.
pub fn fallback_assessment(metrics: &BTreeMap<String, QualityMetric>) -> Map<String, Value> {
    let (weighted_sum, _) = metrics
        .values()
        .fold((0.0, 0.0), |(sum, w), m| (sum + m.score * m.weight, w + m.weight));
    let overall_score = weighted_sum;

    let assessment = if overall_score >= 0.8 {
        "This module demonstrates high code quality with strong adherence to best practices."
    } else if overall_score >= 0.6 {
        "This module shows good code quality with some areas for improvement."
    } else {
        "This module has significant quality issues that need attention."
    };

    let mut strengths: Vec<String> = metrics
        .values()
        .filter(|m| m.score >= 0.8)
        .map(|m| format!("Strong {} (score: {:.2})", m.name.to_lowercase(), m.score))
        .collect();
    if strengths.is_empty() {
        strengths = vec![
            "Potential for improvement".to_string(),
            "Basic functionality present".to_string(),
        ];
    }

    let mut weaknesses: Vec<String> = metrics
        .values()
        .filter(|m| m.score < 0.5)
        .map(|m| format!("Weak {} (score: {:.2})", m.name.to_lowercase(), m.score))
        .collect();
    if weaknesses.is_empty() {
        weaknesses = vec!["Minor optimization opportunities".to_string()];
    }

    // Rank by weighted impact: a low score on a heavy metric first
    let mut priorities: Vec<(&str, f64)> = metrics
        .values()
        .map(|m| (m.name.as_str(), (1.0 - m.score) * m.weight))
        .collect();
    priorities.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let mut improvement_priority: Vec<String> =
        priorities.iter().take(3).map(|(n, _)| n.to_string()).collect();
    if improvement_priority.is_empty() {
        improvement_priority = vec![
            "Code documentation".to_string(),
            "Test coverage".to_string(),
            "Complexity reduction".to_string(),
        ];
    }

    let mut map = Map::new();
    map.insert("overall_assessment".to_string(), json!(assessment));
    map.insert(
        "strengths".to_string(),
        json!(strengths.into_iter().take(3).collect::<Vec<_>>()),
    );
    map.insert(
        "weaknesses".to_string(),
        json!(weaknesses.into_iter().take(3).collect::<Vec<_>>()),
    );
    map.insert("improvement_priority".to_string(), json!(improvement_priority));
    map.insert("confidence".to_string(), json!(0.7));
    map.insert("source".to_string(), json!("fallback_analysis"));
    map
}
