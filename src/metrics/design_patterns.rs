//! Design-pattern scorer
//!
//! Counts named pattern signatures in the text and adds an OOP bonus for
//! inheritance, property accessors, and abstract-method markers.

use crate::metrics::patterns;
use crate::models::{ModuleFacts, QualityMetric};
use serde_json::{json, Map, Value};

pub fn score(facts: &ModuleFacts, weight: f64) -> QualityMetric {
    let content = facts.content.as_str();

    let mut pattern_matches = Map::new();
    let mut total_patterns = 0usize;
    for (name, regex) in patterns::design_patterns() {
        let count = regex.find_iter(content).count();
        pattern_matches.insert((*name).to_string(), json!(count));
        total_patterns += count;
    }

    let has_inheritance = patterns::inheritance().is_match(content);
    let has_properties = patterns::property_decorator().is_match(content);
    let has_abstract_methods = patterns::abstract_marker().is_match(content);

    let oop_score =
        (has_inheritance as u32 + has_properties as u32 + has_abstract_methods as u32) as f64 / 3.0;

    let line_count = content.lines().count().max(1);
    let pattern_density = total_patterns as f64 / line_count as f64 * 100.0;
    let design_score = (pattern_density + oop_score).clamp(0.0, 1.0);

    let mut suggestions = Vec::new();
    if total_patterns == 0 {
        suggestions.push("Consider using design patterns where appropriate".to_string());
    }
    if !has_properties && has_inheritance {
        suggestions.push("Use @property decorators for getter/setter methods".to_string());
    }

    QualityMetric::new(
        "Design Patterns",
        design_score,
        weight,
        "Design pattern usage and OOP practices",
    )
    .with_detail("pattern_matches", Value::Object(pattern_matches))
    .with_detail("total_patterns", total_patterns)
    .with_detail("has_inheritance", has_inheritance)
    .with_detail("has_properties", has_properties)
    .with_detail("has_abstract_methods", has_abstract_methods)
    .with_detail("oop_score", oop_score)
    .with_suggestions(suggestions)
}
