//! Markdown reporter
//!
//! GitHub-flavored Markdown: overview table, per-metric distribution,
//! lowest-scoring modules, and the global recommendation list. Suitable
//! for pasting into PRs or publishing as a report artifact.

use crate::models::{QualityLevel, QualityReport};
use anyhow::Result;
use std::fmt::Write;

/// Render report as Markdown
pub fn render(report: &QualityReport) -> Result<String> {
    let mut out = String::new();

    let overview = &report.overview;
    writeln!(out, "# Quality Report\n")?;
    writeln!(
        out,
        "_{} modules analyzed · critiq v{} · {}_\n",
        overview.total_modules, report.metadata.analyzer_version,
        report.metadata.analysis_timestamp
    )?;

    writeln!(out, "## Overview\n")?;
    writeln!(out, "| | |")?;
    writeln!(out, "|---|---|")?;
    writeln!(out, "| Average score | {:.2} |", overview.average_quality_score)?;
    writeln!(out, "| Median score | {:.2} |", overview.median_quality_score)?;
    writeln!(out, "| Std deviation | {:.2} |", overview.quality_std_dev)?;
    for level in QualityLevel::all() {
        if let Some(count) = overview.quality_level_distribution.get(level.as_str()) {
            writeln!(out, "| {} modules | {} |", level.as_str(), count)?;
        }
    }
    writeln!(out)?;

    if !report.quality_distribution.metric_averages.is_empty() {
        writeln!(out, "## Metric Distribution\n")?;
        writeln!(out, "| Metric | Average | Std Dev | Min | Max |")?;
        writeln!(out, "|---|---|---|---|---|")?;
        for (name, spread) in &report.quality_distribution.metric_averages {
            writeln!(
                out,
                "| {} | {:.2} | {:.2} | {:.2} | {:.2} |",
                name, spread.average, spread.std_dev, spread.min, spread.max
            )?;
        }
        writeln!(out)?;
    }

    if !overview.lowest_quality_modules.is_empty() {
        writeln!(out, "## Modules Needing Attention\n")?;
        for path in &overview.lowest_quality_modules {
            if let Some(assessment) = report.module_assessments.get(path) {
                writeln!(
                    out,
                    "- `{}` — {:.2} ({})",
                    path, assessment.overall_score, assessment.quality_level
                )?;
            }
        }
        writeln!(out)?;
    }

    if !report.recommendations.is_empty() {
        writeln!(out, "## Recommendations\n")?;
        for rec in &report.recommendations {
            writeln!(out, "1. {}", rec)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "## Health\n")?;
    writeln!(out, "{}\n", report.insights.health_assessment)?;
    for area in &report.insights.critical_areas {
        writeln!(out, "- {}", area)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_markdown_sections() {
        let out = render(&test_report()).expect("render markdown");
        assert!(out.starts_with("# Quality Report"));
        assert!(out.contains("## Overview"));
        assert!(out.contains("| Average score | 0.80 |"));
        assert!(out.contains("## Recommendations"));
    }

    #[test]
    fn test_markdown_lists_low_modules() {
        let out = render(&test_report()).expect("render markdown");
        assert!(out.contains("`src/app.py`"));
    }

    #[test]
    fn test_markdown_empty_distribution_omitted() {
        let out = render(&test_report()).expect("render markdown");
        // test_report has an empty metric distribution
        assert!(!out.contains("## Metric Distribution"));
    }
}
