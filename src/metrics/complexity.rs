//! Complexity scorer
//!
//! Works entirely from the per-function complexity numbers supplied by
//! the upstream parser; lower average complexity means a higher score.

use crate::models::{ModuleFacts, QualityMetric};
use serde_json::json;

/// Functions above this complexity are listed by name in the details.
const HIGH_COMPLEXITY: u32 = 7;

pub fn score(facts: &ModuleFacts, weight: f64) -> QualityMetric {
    let complexities: Vec<u32> = facts.functions.iter().map(|f| f.complexity).collect();

    let avg_complexity = if complexities.is_empty() {
        1.0
    } else {
        complexities.iter().sum::<u32>() as f64 / complexities.len() as f64
    };
    let max_complexity = complexities.iter().copied().max().unwrap_or(1);

    let complexity_score = ((10.0 - avg_complexity) / 10.0).clamp(0.0, 1.0);

    let mut suggestions = Vec::new();
    if avg_complexity > 5.0 {
        suggestions.push("Consider breaking down complex functions into smaller ones".to_string());
    }
    if max_complexity > 10 {
        suggestions.push("Refactor highly complex functions (complexity > 10)".to_string());
    }

    let high_complexity_functions: Vec<&str> = facts
        .functions
        .iter()
        .filter(|f| f.complexity > HIGH_COMPLEXITY)
        .map(|f| f.name.as_str())
        .collect();

    QualityMetric::new(
        "Complexity",
        complexity_score,
        weight,
        "Cyclomatic complexity and function size analysis",
    )
    .with_detail("average_complexity", avg_complexity)
    .with_detail("max_complexity", max_complexity)
    .with_detail("total_functions", facts.functions.len())
    .with_detail("high_complexity_functions", json!(high_complexity_functions))
    .with_suggestions(suggestions)
}
