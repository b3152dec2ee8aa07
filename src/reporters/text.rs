//! Text (terminal) reporter with colors and formatting

use crate::models::{QualityLevel, QualityReport};
use anyhow::Result;
use std::fmt::Write;

/// Quality level colors (ANSI escape codes)
fn level_color(level: QualityLevel) -> &'static str {
    match level {
        QualityLevel::Excellent => "\x1b[32m", // Green
        QualityLevel::Good => "\x1b[92m",      // Light green
        QualityLevel::Fair => "\x1b[33m",      // Yellow
        QualityLevel::Poor => "\x1b[91m",      // Light red
        QualityLevel::Critical => "\x1b[31m",  // Red
    }
}

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Render report as formatted terminal output
pub fn render(report: &QualityReport) -> Result<String> {
    let mut out = String::new();

    let overview = &report.overview;
    writeln!(out, "{}critiq quality report{}", BOLD, RESET)?;
    writeln!(
        out,
        "{}analyzed {} modules at {}{}",
        DIM, overview.total_modules, report.metadata.analysis_timestamp, RESET
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "  average score: {}{:.2}{}   median: {:.2}   stddev: {:.2}",
        BOLD, overview.average_quality_score, RESET, overview.median_quality_score,
        overview.quality_std_dev
    )?;
    writeln!(out)?;

    // Per-level counts, best level first
    for level in QualityLevel::all() {
        let count = overview
            .quality_level_distribution
            .get(level.as_str())
            .copied()
            .unwrap_or(0);
        if count > 0 {
            writeln!(
                out,
                "  {}{:>9}{}: {}",
                level_color(level),
                level.as_str(),
                RESET,
                count
            )?;
        }
    }
    writeln!(out)?;

    // Module table, worst first so problems lead
    let mut modules: Vec<_> = report.module_assessments.values().collect();
    modules.sort_by(|a, b| {
        a.overall_score
            .partial_cmp(&b.overall_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    writeln!(out, "{}modules{}", BOLD, RESET)?;
    for assessment in &modules {
        writeln!(
            out,
            "  {:.2} {}{:<9}{} {}",
            assessment.overall_score,
            level_color(assessment.quality_level),
            assessment.quality_level.as_str(),
            RESET,
            assessment.module_path
        )?;
    }
    writeln!(out)?;

    if !report.recommendations.is_empty() {
        writeln!(out, "{}top recommendations{}", BOLD, RESET)?;
        for rec in &report.recommendations {
            writeln!(out, "  - {}", rec)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "{}{}{}", DIM, report.insights.health_assessment, RESET)?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_text_render_contains_summary() {
        let out = render(&test_report()).expect("render text");
        assert!(out.contains("critiq quality report"));
        assert!(out.contains("average score"));
        assert!(out.contains("src/app.py"));
        assert!(out.contains("0.80"));
    }

    #[test]
    fn test_text_render_lists_recommendations() {
        let out = render(&test_report()).expect("render text");
        assert!(out.contains("Add docstrings (affects 2 modules)"));
    }

    #[test]
    fn test_text_render_empty_report() {
        let mut report = test_report();
        report.module_assessments.clear();
        report.recommendations.clear();
        let out = render(&report).expect("render text");
        assert!(out.contains("critiq quality report"));
        assert!(!out.contains("top recommendations"));
    }
}
