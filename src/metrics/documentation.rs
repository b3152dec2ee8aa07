//! Documentation scorer
//!
//! Ratio of structured comment blocks to function/class declarations,
//! with bonuses for a module-level docstring and inline comments.

use crate::metrics::patterns;
use crate::models::{ModuleFacts, QualityMetric};

pub fn score(facts: &ModuleFacts, weight: f64) -> QualityMetric {
    let content = facts.content.as_str();

    let documented_items = patterns::docstring_block().find_iter(content).count();
    let functions = patterns::function_decl().find_iter(content).count();
    let classes = patterns::class_decl().find_iter(content).count();
    let total_items = functions + classes;

    let doc_ratio = if total_items > 0 {
        documented_items as f64 / total_items as f64
    } else {
        0.0
    };

    let trimmed = content.trim_start();
    let has_module_docstring = trimmed.starts_with("\"\"\"") || trimmed.starts_with("'''");
    let inline_comments = patterns::inline_comment().find_iter(content).count();

    let mut base_score = doc_ratio;
    if has_module_docstring {
        base_score += 0.2;
    }
    if inline_comments > 0 {
        base_score += 0.1;
    }
    let doc_score = base_score.clamp(0.0, 1.0);

    let mut suggestions = Vec::new();
    if doc_ratio < 0.5 {
        suggestions.push("Add docstrings to functions and classes".to_string());
    }
    if !has_module_docstring {
        suggestions.push("Add module-level docstring".to_string());
    }
    if inline_comments == 0 {
        suggestions.push("Add inline comments for complex logic".to_string());
    }

    QualityMetric::new(
        "Documentation",
        doc_score,
        weight,
        "Documentation coverage and quality",
    )
    .with_detail("documentation_ratio", doc_ratio)
    .with_detail("total_items", total_items)
    .with_detail("documented_items", documented_items)
    .with_detail("has_module_docstring", has_module_docstring)
    .with_detail("inline_comments", inline_comments)
    .with_suggestions(suggestions)
}
