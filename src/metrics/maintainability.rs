//! Maintainability scorer
//!
//! Two halves: average function body length derived from scanning
//! declaration boundaries, and the balance of good vs bad idioms found
//! in the text.

use crate::metrics::patterns;
use crate::models::{ModuleFacts, QualityMetric};

/// Function body lengths, by scanning declaration boundaries.
///
/// A function starts at an indented-or-not `def` line and ends when a new
/// top-level statement begins. Blank lines inside a body do not count
/// toward its length.
fn function_lengths(lines: &[&str]) -> Vec<usize> {
    let mut lengths = Vec::new();
    let mut current = 0usize;
    let mut in_function = false;

    for line in lines {
        if patterns::function_start().is_match(line) {
            if in_function && current > 0 {
                lengths.push(current);
            }
            in_function = true;
            current = 1;
        } else if in_function {
            if !line.trim().is_empty() {
                current += 1;
            }
            if patterns::toplevel_start().is_match(line) {
                lengths.push(current);
                in_function = false;
            }
        }
    }
    if in_function && current > 0 {
        lengths.push(current);
    }
    lengths
}

pub fn score(facts: &ModuleFacts, weight: f64) -> QualityMetric {
    let content = facts.content.as_str();
    let lines: Vec<&str> = content.lines().collect();
    let total_lines = lines.len();
    let code_lines = lines
        .iter()
        .filter(|l| !l.trim().is_empty() && !l.trim().starts_with('#'))
        .count();

    let lengths = function_lengths(&lines);
    let avg_function_length = if lengths.is_empty() {
        0.0
    } else {
        lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
    };

    let good_patterns = patterns::good_patterns()
        .iter()
        .filter(|p| p.is_match(content))
        .count();
    let bad_patterns = patterns::bad_patterns()
        .iter()
        .filter(|p| p.is_match(content))
        .count();

    let length_score = ((50.0 - avg_function_length) / 50.0).clamp(0.0, 1.0);
    let pattern_score = ((good_patterns as f64 - bad_patterns as f64 * 2.0)
        / (good_patterns + bad_patterns).max(1) as f64)
        .clamp(0.0, 1.0);

    let maintainability_score = (length_score + pattern_score) / 2.0;

    let mut suggestions = Vec::new();
    if avg_function_length > 30.0 {
        suggestions.push("Break down large functions (>30 lines)".to_string());
    }
    if bad_patterns > 0 {
        suggestions.push("Avoid anti-patterns like global variables and eval()".to_string());
    }

    QualityMetric::new(
        "Maintainability",
        maintainability_score,
        weight,
        "Code maintainability and readability factors",
    )
    .with_detail("average_function_length", avg_function_length)
    .with_detail("total_lines", total_lines)
    .with_detail("code_lines", code_lines)
    .with_detail("good_patterns", good_patterns)
    .with_detail("bad_patterns", bad_patterns)
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
    fn test_empty_text_within_bounds() {
        let metric = score(&facts(""), 0.2);
        assert!((0.0..=1.0).contains(&metric.score));
    }

    #[test]
    fn test_clean_short_functions_score_high() {
        let content = "\
import logging

def add(a, b):
    \"\"\"Add.\"\"\"
    return a + b

def sub(a, b):
    \"\"\"Sub.\"\"\"
    return a - b

if __name__ == \"__main__\":
    logging.info(add(1, 2))
";
        let metric = score(&facts(content), 0.2);
        assert!(metric.score > 0.8, "score={}", metric.score);
        assert!(metric.suggestions.is_empty());
    }

    #[test]
    fn test_bad_patterns_penalized() {
        let content = "\
def run():
    global state
    eval(user_input)
    print(state)
";
        let metric = score(&facts(content), 0.2);
        let bad = metric.details["bad_patterns"].as_u64().unwrap();
        assert!(bad >= 3, "bad_patterns={}", bad);
        assert!(metric
            .suggestions
            .iter()
            .any(|s| s.contains("anti-patterns")));
    }

    #[test]
    fn test_function_length_scan() {
        let lines: Vec<&str> = vec![
            "def long_one():",
            "    a = 1",
            "    b = 2",
            "    return a + b",
            "",
            "X = 1",
        ];
        let lengths = function_lengths(&lines);
        assert_eq!(lengths, vec![5]);
    }

    #[test]
    fn test_long_functions_get_suggestion() {
        let mut content = String::from("def huge():\n");
        for i in 0..40 {
            content.push_str(&format!("    x{} = {}\n", i, i));
        }
        let metric = score(&facts(&content), 0.2);
        assert!(metric
            .suggestions
            .iter()
            .any(|s| s.contains("large functions")));
    }
}
