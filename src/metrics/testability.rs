//! Testability scorer
//!
//! Combines the ratio of test-named functions with four boolean
//! indicators: assertions, mocking, a main-guard idiom, and a
//! constructor that accepts parameters (injection-friendly).

use crate::metrics::patterns;
use crate::models::{ModuleFacts, QualityMetric};

pub fn score(facts: &ModuleFacts, weight: f64) -> QualityMetric {
    let content = facts.content.as_str();

    let test_functions = patterns::test_function().find_iter(content).count();
    let total_functions = patterns::function_decl().find_iter(content).count();
    let assert_statements = patterns::assert_stmt().find_iter(content).count();
    let mock_usage = patterns::mock_usage().find_iter(content).count();
    let constructor_params = patterns::parameterized_ctor().find_iter(content).count();
    let has_main_guard = patterns::main_guard().is_match(content);

    let test_coverage_score = if total_functions > 0 {
        test_functions as f64 / total_functions as f64
    } else {
        0.0
    };

    let indicators = (assert_statements > 0) as u32
        + (mock_usage > 0) as u32
        + has_main_guard as u32
        + (constructor_params > 0) as u32;

    let testability_score = (test_coverage_score + indicators as f64 / 4.0) / 2.0;

    let mut suggestions = Vec::new();
    if test_functions == 0 {
        suggestions.push("Add unit tests for functions".to_string());
    }
    if !has_main_guard {
        suggestions.push("Add if __name__ == '__main__': guard".to_string());
    }
    if constructor_params == 0 && total_functions > 0 {
        suggestions.push("Consider dependency injection for better testability".to_string());
    }

    QualityMetric::new(
        "Testability",
        testability_score,
        weight,
        "Code testability and test coverage indicators",
    )
    .with_detail("test_functions", test_functions)
    .with_detail("total_functions", total_functions)
    .with_detail("assert_statements", assert_statements)
    .with_detail("mock_usage", mock_usage)
    .with_detail("has_main_guard", has_main_guard)
    .with_detail("test_coverage_ratio", test_coverage_score)
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
    fn test_empty_text_scores_zero() {
        let metric = score(&facts(""), 0.15);
        assert_eq!(metric.score, 0.0);
    }

    #[test]
    fn test_test_heavy_module_scores_high() {
        let content = "\
def test_add():
    assert add(1, 2) == 3

def test_sub():
    assert sub(2, 1) == 1

if __name__ == \"__main__\":
    run_tests()
";
        let metric = score(&facts(content), 0.15);
        assert!(metric.score > 0.7, "score={}", metric.score);
    }

    #[test]
    fn test_untested_module_gets_suggestions() {
        let content = "def process(data):\n    return data * 2\n";
        let metric = score(&facts(content), 0.15);
        assert!(metric.suggestions.iter().any(|s| s.contains("unit tests")));
        assert!(metric
            .suggestions
            .iter()
            .any(|s| s.contains("dependency injection")));
    }

    #[test]
    fn test_mock_usage_counts_as_indicator() {
        let plain = score(&facts("def test_x():\n    pass\n"), 0.15);
        let mocked = score(
            &facts("def test_x():\n    client = Mock()\n    pass\n"),
            0.15,
        );
        assert!(mocked.score > plain.score);
    }

    #[test]
    fn test_score_bounds() {
        let content = "def test_a():\n    assert True\n";
        let metric = score(&facts(content), 0.15);
        assert!((0.0..=1.0).contains(&metric.score));
    }
}
