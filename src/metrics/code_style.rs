//! Code-style scorer
//!
//! Four evenly weighted sub-scores: line length, indentation
//! consistency, trailing whitespace, and naming conventions.

use crate::metrics::patterns;
use crate::models::{ModuleFacts, QualityMetric};

/// Common formatter default; lines beyond this are flagged.
const MAX_LINE_LENGTH: usize = 88;

/// True when indentation is inconsistent: not every observed indent is an
/// integer multiple of the smallest one.
fn inconsistent_indentation(lines: &[&str]) -> bool {
    let indents: Vec<usize> = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .filter(|&i| i > 0)
        .collect();

    let Some(&min_indent) = indents.iter().min() else {
        return false;
    };
    !indents.iter().all(|i| i % min_indent == 0)
}

pub fn score(facts: &ModuleFacts, weight: f64) -> QualityMetric {
    let content = facts.content.as_str();
    let lines: Vec<&str> = content.lines().collect();

    let long_lines = lines.iter().filter(|l| l.len() > MAX_LINE_LENGTH).count();
    let inconsistent = inconsistent_indentation(&lines);
    let has_trailing_whitespace = lines
        .iter()
        .any(|l| l.ends_with(' ') || l.ends_with('\t'));

    let snake_case_functions = patterns::snake_case_function().find_iter(content).count();
    let pascal_case_classes = patterns::pascal_case_class().find_iter(content).count();
    let total_functions = patterns::function_decl().find_iter(content).count();
    let total_classes = patterns::class_decl().find_iter(content).count();

    let line_length_score = (1.0 - long_lines as f64 / lines.len().max(1) as f64).max(0.0);
    let indentation_score = if inconsistent { 0.5 } else { 1.0 };
    let whitespace_score = if has_trailing_whitespace { 0.0 } else { 1.0 };
    let naming_score = if total_functions + total_classes > 0 {
        (snake_case_functions as f64 / total_functions.max(1) as f64
            + pascal_case_classes as f64 / total_classes.max(1) as f64)
            / 2.0
    } else {
        1.0
    };

    let style_score =
        (line_length_score + indentation_score + whitespace_score + naming_score) / 4.0;

    let mut suggestions = Vec::new();
    if long_lines > 0 {
        suggestions.push(format!(
            "Fix {} lines that are too long (>{} characters)",
            long_lines, MAX_LINE_LENGTH
        ));
    }
    if inconsistent {
        suggestions.push("Fix inconsistent indentation".to_string());
    }
    if has_trailing_whitespace {
        suggestions.push("Remove trailing whitespace".to_string());
    }

    QualityMetric::new(
        "Code Style",
        style_score,
        weight,
        "Code formatting and style conventions",
    )
    .with_detail("long_lines", long_lines)
    .with_detail("inconsistent_indentation", inconsistent)
    .with_detail("has_trailing_whitespace", has_trailing_whitespace)
    .with_detail("naming_convention_score", naming_score)
    .with_detail("total_lines", lines.len())
    .with_suggestions(suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(content: &str) -> ModuleFacts {
        ModuleFacts {
            path: "src/app.py".to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_code_scores_perfect() {
        let content = "def snake_name():\n    return 1\n\nclass PascalName:\n    pass\n";
        let metric = score(&facts(content), 0.1);
        assert_eq!(metric.score, 1.0);
        assert!(metric.suggestions.is_empty());
    }

    #[test]
    fn test_empty_text_is_not_penalized() {
        let metric = score(&facts(""), 0.1);
        assert_eq!(metric.score, 1.0);
    }

    #[test]
    fn test_long_lines_flagged() {
        let content = format!("x = \"{}\"\n", "a".repeat(100));
        let metric = score(&facts(&content), 0.1);
        assert_eq!(metric.details["long_lines"], 1);
        assert!(metric.suggestions.iter().any(|s| s.contains("too long")));
    }

    #[test]
    fn test_trailing_whitespace_zeroes_subscore() {
        let clean = score(&facts("x = 1\n"), 0.1);
        let dirty = score(&facts("x = 1 \n"), 0.1);
        assert!((clean.score - dirty.score - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_inconsistent_indentation_detected() {
        // 4-space base with a stray 3-space indent
        let lines = vec!["def f():", "    a = 1", "   b = 2"];
        assert!(inconsistent_indentation(&lines));

        let lines = vec!["def f():", "    a = 1", "        b = 2"];
        assert!(!inconsistent_indentation(&lines));
    }

    #[test]
    fn test_flat_file_is_consistent() {
        assert!(!inconsistent_indentation(&["x = 1", "y = 2"]));
        assert!(!inconsistent_indentation(&[]));
    }

    #[test]
    fn test_naming_convention_mixed() {
        let content = "def BadName():\n    pass\n\ndef good_name():\n    pass\n";
        let metric = score(&facts(content), 0.1);
        let naming = metric.details["naming_convention_score"].as_f64().unwrap();
        assert!(naming < 1.0);
    }
}
