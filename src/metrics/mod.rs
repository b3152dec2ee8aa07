//! Metric engine: seven independent quality scorers
//!
//! Each scorer is a pure function `(&ModuleFacts, weight) -> QualityMetric`,
//! callable in any order with no shared state. Scores are always within
//! `0.0..=1.0` for any legal input, including empty text and zero
//! functions.

pub mod code_style;
pub mod complexity;
pub mod design_patterns;
pub mod documentation;
pub mod maintainability;
pub(crate) mod patterns;
pub mod security;
pub mod testability;

use crate::config::MetricWeights;
use crate::models::{ModuleFacts, QualityMetric};
use std::collections::BTreeMap;

/// Canonical metric keys, in the order the report lists them.
pub const METRIC_KEYS: [&str; 7] = [
    "complexity",
    "documentation",
    "maintainability",
    "testability",
    "design_patterns",
    "code_style",
    "security",
];

/// Run all seven scorers over one module.
pub fn score_module(
    facts: &ModuleFacts,
    weights: &MetricWeights,
) -> BTreeMap<String, QualityMetric> {
    let mut metrics = BTreeMap::new();
    metrics.insert(
        "complexity".to_string(),
        complexity::score(facts, weights.complexity),
    );
    metrics.insert(
        "documentation".to_string(),
        documentation::score(facts, weights.documentation),
    );
    metrics.insert(
        "maintainability".to_string(),
        maintainability::score(facts, weights.maintainability),
    );
    metrics.insert(
        "testability".to_string(),
        testability::score(facts, weights.testability),
    );
    metrics.insert(
        "design_patterns".to_string(),
        design_patterns::score(facts, weights.design_patterns),
    );
    metrics.insert(
        "code_style".to_string(),
        code_style::score(facts, weights.code_style),
    );
    metrics.insert(
        "security".to_string(),
        security::score(facts, weights.security),
    );
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_present() {
        let facts = ModuleFacts {
            path: "src/app.py".to_string(),
            content: "def f():\n    return 1\n".to_string(),
            ..Default::default()
        };
        let metrics = score_module(&facts, &MetricWeights::default());
        for key in METRIC_KEYS {
            assert!(metrics.contains_key(key), "missing metric {}", key);
        }
        assert_eq!(metrics.len(), METRIC_KEYS.len());
    }

    #[test]
    fn test_all_scores_in_bounds_on_degenerate_input() {
        let facts = ModuleFacts::default();
        for metric in score_module(&facts, &MetricWeights::default()).values() {
            assert!(
                (0.0..=1.0).contains(&metric.score),
                "{} out of bounds: {}",
                metric.name,
                metric.score
            );
        }
    }

    #[test]
    fn test_weights_threaded_through() {
        let weights = MetricWeights {
            complexity: 0.5,
            ..Default::default()
        };
        let metrics = score_module(&ModuleFacts::default(), &weights);
        assert_eq!(metrics["complexity"].weight, 0.5);
        assert_eq!(metrics["security"].weight, 0.1);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let facts = ModuleFacts {
            path: "src/app.py".to_string(),
            content: "\"\"\"Mod.\"\"\"\n\ndef f(x):\n    # double\n    return x * 2\n".to_string(),
            ..Default::default()
        };
        let a = score_module(&facts, &MetricWeights::default());
        let b = score_module(&facts, &MetricWeights::default());
        for key in METRIC_KEYS {
            assert_eq!(a[key].score, b[key].score);
            assert_eq!(a[key].suggestions, b[key].suggestions);
        }
    }
}
