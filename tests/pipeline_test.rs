//! Integration tests for the quality scoring pipeline
//!
//! These tests run the full pipeline as a library over inline structural
//! facts with the LLM disabled, verifying:
//! - Every module yields a complete, well-shaped assessment
//! - Malformed upstream entries are skipped, not fatal
//! - Repository rollup statistics and recommendation ranking
//! - Report rendering in every output format

use critiq::assess::QualityPipeline;
use critiq::config::QualityConfig;
use critiq::llm::QualityEnhancer;
use critiq::models::CodeAnalysis;
use critiq::reporters::{self, OutputFormat};
use serde_json::json;

const CLEAN_MODULE: &str = r#""""Order handling service."""

import logging

logger = logging.getLogger(__name__)


class OrderService:
    """Coordinates order persistence and notification."""

    def __init__(self, repository, notifier):
        self.repository = repository
        self.notifier = notifier

    def place_order(self, order):
        """Persist an order and notify listeners."""
        try:
            self.repository.save(order)
            self.notifier.send(order)
        except ValueError:
            logger.error("could not place order")


def test_place_order():
    service = OrderService(Mock(), Mock())
    service.place_order({"id": 1})
    assert service.repository.save.called


if __name__ == "__main__":
    test_place_order()
"#;

const MESSY_MODULE: &str = r#"import os

password = "hunter2"

def run(cmd):
    global last
    eval(cmd)
    os.system(cmd)
    print(cmd)
"#;

fn facts_document() -> CodeAnalysis {
    serde_json::from_value(json!({
        "modules": [
            {
                "path": "src/orders.py",
                "content": CLEAN_MODULE,
                "functions": [
                    {"name": "place_order", "complexity": 3},
                    {"name": "test_place_order", "complexity": 1}
                ],
                "classes": [{"name": "OrderService", "methods": ["place_order"]}]
            },
            {
                "path": "src/legacy.py",
                "content": MESSY_MODULE,
                "functions": [{"name": "run", "complexity": 14}]
            },
            "src/just_a_string.py",
            {
                "path": "src/empty.py",
                "content": ""
            }
        ]
    }))
    .expect("valid facts document")
}

fn run_pipeline() -> critiq::models::QualityReport {
    let pipeline = QualityPipeline::new(QualityConfig::default(), QualityEnhancer::disabled());
    pipeline.run(&facts_document(), None, &[])
}

#[test]
fn test_run_assesses_structured_modules_and_skips_strings() {
    let report = run_pipeline();
    assert_eq!(report.metadata.total_modules_analyzed, 3);
    assert!(report.module_assessments.contains_key("src/orders.py"));
    assert!(report.module_assessments.contains_key("src/legacy.py"));
    assert!(report.module_assessments.contains_key("src/empty.py"));
    assert!(!report.module_assessments.contains_key("src/just_a_string.py"));
}

#[test]
fn test_all_scores_within_bounds() {
    let report = run_pipeline();
    for assessment in report.module_assessments.values() {
        assert!(
            (0.0..=1.0).contains(&assessment.overall_score),
            "{} out of bounds",
            assessment.module_path
        );
        for metric in assessment.metrics.values() {
            assert!(
                (0.0..=1.0).contains(&metric.score),
                "{}:{} out of bounds",
                assessment.module_path,
                metric.name
            );
        }
    }
}

#[test]
fn test_clean_module_outranks_messy_module() {
    let report = run_pipeline();
    let clean = &report.module_assessments["src/orders.py"];
    let messy = &report.module_assessments["src/legacy.py"];
    assert!(
        clean.overall_score > messy.overall_score,
        "clean {:.2} should beat messy {:.2}",
        clean.overall_score,
        messy.overall_score
    );
    assert!(messy.metrics["security"].score < 0.5);
}

#[test]
fn test_fallback_assessment_is_complete_without_llm() {
    let report = run_pipeline();
    for assessment in report.module_assessments.values() {
        for key in [
            "overall_assessment",
            "strengths",
            "weaknesses",
            "improvement_priority",
        ] {
            assert!(
                assessment.llm_assessment.contains_key(key),
                "{} missing {}",
                assessment.module_path,
                key
            );
        }
        assert_eq!(assessment.llm_assessment["source"], "fallback_analysis");
    }
    assert!(!report.metadata.llm_enabled);
}

#[test]
fn test_messy_module_gets_security_recommendations() {
    let report = run_pipeline();
    let messy = &report.module_assessments["src/legacy.py"];
    assert!(messy
        .recommendations
        .iter()
        .any(|r| r.contains("eval()")));
    assert!(messy
        .recommendations
        .iter()
        .any(|r| r.contains("hardcoded")));
}

#[test]
fn test_overview_statistics_cover_all_assessed_modules() {
    let report = run_pipeline();
    assert_eq!(report.overview.total_modules, 3);
    let counted: usize = report.overview.quality_level_distribution.values().sum();
    assert_eq!(counted, 3);
    assert!(report.overview.average_quality_score > 0.0);
    assert!(report.overview.top_quality_modules.contains(&"src/orders.py".to_string()));
}

#[test]
fn test_global_recommendations_require_recurrence() {
    let report = run_pipeline();
    // Every entry must carry the "(affects N modules)" annotation with N >= 2
    for rec in &report.recommendations {
        assert!(
            rec.contains("(affects ") && rec.contains(" modules)"),
            "unannotated recommendation: {}",
            rec
        );
    }
    // "Avoid using eval()" appears only in legacy.py, so never globally
    assert!(!report
        .recommendations
        .iter()
        .any(|r| r.starts_with("Avoid using eval()")));
}

#[test]
fn test_distribution_covers_every_metric() {
    let report = run_pipeline();
    for key in critiq::metrics::METRIC_KEYS {
        assert!(
            report.quality_distribution.metric_averages.contains_key(key),
            "distribution missing {}",
            key
        );
    }
    let ranges: usize = report.quality_distribution.quality_ranges.values().sum();
    assert_eq!(ranges, 3);
}

#[test]
fn test_report_renders_in_all_formats() {
    let report = run_pipeline();
    for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Markdown] {
        let out = reporters::render(&report, format).expect("render");
        assert!(!out.is_empty(), "{} output empty", format);
    }

    let json_out = reporters::render(&report, OutputFormat::Json).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json_out).expect("valid JSON report");
    assert!(parsed["module_assessments"]["src/orders.py"]["metrics"]["security"]["score"]
        .is_number());
}

#[test]
fn test_trends_report_current_snapshot() {
    let report = run_pipeline();
    assert_eq!(report.trends.current_snapshot.total_modules, 3);
    assert!(report.trends.current_snapshot.average_score > 0.0);
}

#[test]
fn test_custom_thresholds_change_levels() {
    let mut config = QualityConfig::default();
    // With a floor-level excellent threshold everything classifies excellent
    config.thresholds.excellent = 0.0;
    let pipeline = QualityPipeline::new(config, QualityEnhancer::disabled());
    let report = pipeline.run(&facts_document(), None, &[]);
    for assessment in report.module_assessments.values() {
        assert_eq!(assessment.quality_level.as_str(), "excellent");
    }
}
