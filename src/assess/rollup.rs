//! Repository-wide rollup
//!
//! Aggregates per-module assessments into the overview, metric
//! distribution, global recommendations, trend, and insight sections of
//! the report. Tolerates empty assessment sets and assessments with
//! missing scores: those are skipped, never fatal.

use crate::assess::stats;
use crate::models::{
    Insights, MetricSpread, Overview, QualityAssessment, QualityDistribution, QualityLevel,
    TrendDirection, TrendSnapshot, Trends,
};
use std::collections::BTreeMap;

/// Maximum entries in the global recommendation list.
const MAX_GLOBAL_RECOMMENDATIONS: usize = 10;

/// Band around equality treated as "stable" when classifying trends.
const TREND_BAND: f64 = 0.05;

/// Score statistics across all modules. Assessments whose score is not
/// a finite number are skipped; an all-invalid set yields a zero-filled
/// overview rather than failing.
pub fn build_overview(assessments: &[QualityAssessment]) -> Overview {
    if assessments.is_empty() {
        return Overview::default();
    }

    let valid: Vec<&QualityAssessment> = assessments
        .iter()
        .filter(|a| a.overall_score.is_finite())
        .collect();
    if valid.is_empty() {
        return Overview {
            total_modules: assessments.len(),
            ..Default::default()
        };
    }

    let scores: Vec<f64> = valid.iter().map(|a| a.overall_score).collect();

    let mut level_distribution: BTreeMap<String, usize> = BTreeMap::new();
    for a in &valid {
        *level_distribution
            .entry(a.quality_level.as_str().to_string())
            .or_insert(0) += 1;
    }

    let mut by_score: Vec<&QualityAssessment> = valid.clone();
    by_score.sort_by(|a, b| {
        b.overall_score
            .partial_cmp(&a.overall_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let top: Vec<String> = by_score
        .iter()
        .take(5)
        .map(|a| a.module_path.clone())
        .collect();
    let bottom: Vec<String> = by_score
        .iter()
        .rev()
        .take(5)
        .map(|a| a.module_path.clone())
        .collect();

    Overview {
        average_quality_score: stats::mean(&scores),
        median_quality_score: stats::median(&scores),
        quality_std_dev: stats::std_dev(&scores),
        total_modules: assessments.len(),
        quality_level_distribution: level_distribution,
        top_quality_modules: top,
        lowest_quality_modules: bottom,
    }
}

/// Per-metric spread and per-level counts across modules.
pub fn build_distribution(assessments: &[QualityAssessment]) -> QualityDistribution {
    if assessments.is_empty() {
        return QualityDistribution::default();
    }

    let mut metric_averages: BTreeMap<String, MetricSpread> = BTreeMap::new();
    let metric_names: Vec<String> = assessments[0].metrics.keys().cloned().collect();

    for name in metric_names {
        let scores: Vec<f64> = assessments
            .iter()
            .filter_map(|a| a.metrics.get(&name).map(|m| m.score))
            .collect();
        let spread = if scores.is_empty() {
            MetricSpread::default()
        } else {
            MetricSpread {
                average: stats::mean(&scores),
                std_dev: stats::std_dev(&scores),
                min: scores.iter().cloned().fold(f64::INFINITY, f64::min),
                max: scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            }
        };
        metric_averages.insert(name, spread);
    }

    let mut quality_ranges: BTreeMap<String, usize> = BTreeMap::new();
    for level in QualityLevel::all() {
        let count = assessments
            .iter()
            .filter(|a| a.quality_level == level)
            .count();
        quality_ranges.insert(level.as_str().to_string(), count);
    }

    QualityDistribution {
        metric_averages,
        quality_ranges,
    }
}

/// Frequency-ranked recommendations recurring across modules.
///
/// Exact-string counting; recommendations seen in only one module are
/// dropped, the rest are annotated with how many modules they affect and
/// capped at the top 10 by frequency.
pub fn global_recommendations(assessments: &[QualityAssessment]) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for assessment in assessments {
        for rec in &assessment.recommendations {
            *counts.entry(rec.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().filter(|(_, n)| *n > 1).collect();
    // Descending by frequency; BTreeMap iteration makes ties alphabetical
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(MAX_GLOBAL_RECOMMENDATIONS)
        .map(|(rec, n)| format!("{} (affects {} modules)", rec, n))
        .collect()
}

/// Current snapshot plus a deterministic direction classification when
/// the caller supplies prior snapshots. No history is persisted here.
pub fn build_trends(
    assessments: &[QualityAssessment],
    history: &[TrendSnapshot],
    timestamp: &str,
) -> Trends {
    let scores: Vec<f64> = assessments
        .iter()
        .filter(|a| a.overall_score.is_finite())
        .map(|a| a.overall_score)
        .collect();

    let current = TrendSnapshot {
        timestamp: timestamp.to_string(),
        total_modules: assessments.len(),
        average_score: stats::mean(&scores),
    };

    let mut all_points: Vec<f64> = history.iter().map(|s| s.average_score).collect();
    all_points.push(current.average_score);

    if all_points.len() < 2 {
        return Trends {
            current_snapshot: current,
            direction: TrendDirection::InsufficientData,
            trend_strength: 0.0,
            observations: vec![
                "Historical trend analysis requires multiple analysis runs over time".to_string(),
            ],
        };
    }

    // Recent three runs against everything earlier
    let split = all_points.len().saturating_sub(3).max(1);
    let (earlier, recent) = all_points.split_at(split.min(all_points.len() - 1));
    let recent_avg = stats::mean(recent);
    let earlier_avg = stats::mean(earlier);
    let delta = recent_avg - earlier_avg;

    let direction = if delta > TREND_BAND {
        TrendDirection::Improving
    } else if delta < -TREND_BAND {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    };

    let strength = (delta.abs() / TREND_BAND).min(1.0);

    Trends {
        current_snapshot: current,
        direction,
        trend_strength: strength,
        observations: vec![format!(
            "Average score moved {:+.3} against the prior runs",
            delta
        )],
    }
}

/// Deterministic codebase-health narrative derived from the overview.
pub fn build_insights(overview: &Overview) -> Insights {
    let avg = overview.average_quality_score;

    let (health_assessment, critical_areas) = if avg >= 0.8 {
        (
            "Codebase shows excellent quality with strong engineering practices.",
            vec![
                "Maintain current standards".to_string(),
                "Consider advanced optimizations".to_string(),
            ],
        )
    } else if avg >= 0.6 {
        (
            "Codebase has good quality with room for targeted improvements.",
            vec![
                "Focus on lowest-scoring modules".to_string(),
                "Improve documentation coverage".to_string(),
            ],
        )
    } else {
        (
            "Codebase requires significant quality improvements across multiple areas.",
            vec![
                "Address complexity issues".to_string(),
                "Improve test coverage".to_string(),
                "Enhance documentation".to_string(),
            ],
        )
    };

    Insights {
        health_assessment: health_assessment.to_string(),
        health_score: avg,
        critical_areas,
        strategic_recommendations: vec![
            "Implement regular quality monitoring".to_string(),
            "Establish quality gates in CI/CD".to_string(),
            "Provide team training on best practices".to_string(),
        ],
    }
}
