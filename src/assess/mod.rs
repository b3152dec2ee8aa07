//! Assessment pipeline
//!
//! Combines the metric engine, the optional similarity collaborator, and
//! the LLM enhancer into per-module `QualityAssessment`s, then rolls all
//! modules up into the repository `QualityReport`. Modules are processed
//! one at a time, fully scored before the next begins; the only blocking
//! operation is the single consolidated LLM call per module.

pub mod rollup;
pub mod stats;

use crate::config::{LevelThresholds, QualityConfig};
use crate::llm::{fallback_assessment, QualityEnhancer};
use crate::metrics;
use crate::models::{
    now_iso8601, ArchContext, CodeAnalysis, ModuleFacts, QualityAssessment, QualityLevel,
    QualityMetric, QualityReport, ReportMetadata, TrendSnapshot,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{error, info, warn};

/// Optional embedding-based similarity collaborator. When absent, every
/// assessment reports a similarity of 0.0.
pub trait SimilarityProvider {
    fn similarity(&self, content: &str) -> f64;
}

/// Weight-normalized overall score; 0.0 for an empty metric set.
pub fn overall_score(metrics: &BTreeMap<String, QualityMetric>) -> f64 {
    let (weighted, total_weight) = metrics
        .values()
        .fold((0.0, 0.0), |(s, w), m| (s + m.score * m.weight, w + m.weight));
    if total_weight > 0.0 {
        weighted / total_weight
    } else {
        0.0
    }
}

/// Threshold lookup, evaluated best-first; first match wins. Boundaries
/// are closed on the lower bound.
pub fn determine_level(score: f64, thresholds: &LevelThresholds) -> QualityLevel {
    if score >= thresholds.excellent {
        QualityLevel::Excellent
    } else if score >= thresholds.good {
        QualityLevel::Good
    } else if score >= thresholds.fair {
        QualityLevel::Fair
    } else if score >= thresholds.poor {
        QualityLevel::Poor
    } else {
        QualityLevel::Critical
    }
}

/// Union of metric suggestions and up to two LLM-prioritized items,
/// deduplicated with stable order.
fn module_recommendations(
    metrics: &BTreeMap<String, QualityMetric>,
    llm_assessment: &Map<String, Value>,
) -> Vec<String> {
    let mut recommendations: Vec<String> = Vec::new();

    for metric in metrics.values() {
        recommendations.extend(metric.suggestions.iter().cloned());
    }

    if let Some(priorities) = llm_assessment
        .get("improvement_priority")
        .and_then(|v| v.as_array())
    {
        for priority in priorities.iter().take(2).filter_map(|p| p.as_str()) {
            recommendations.push(format!(
                "Focus on improving {} as a priority",
                priority.to_lowercase()
            ));
        }
    }

    let mut seen = std::collections::BTreeSet::new();
    recommendations.retain(|r| seen.insert(r.clone()));
    recommendations
}

/// The quality scoring pipeline.
pub struct QualityPipeline {
    config: QualityConfig,
    enhancer: QualityEnhancer,
    similarity: Option<Box<dyn SimilarityProvider>>,
}

impl QualityPipeline {
    pub fn new(config: QualityConfig, enhancer: QualityEnhancer) -> Self {
        Self {
            config,
            enhancer,
            similarity: None,
        }
    }

    /// Attach the optional embedding collaborator.
    pub fn with_similarity(mut self, provider: Box<dyn SimilarityProvider>) -> Self {
        self.similarity = Some(provider);
        self
    }

    /// Score one module: run all seven metric scorers, derive the
    /// overall score and level, then attach the narrative assessment.
    ///
    /// LLM failures are logged and replaced with the deterministic
    /// fallback — a single module never sinks the run.
    pub fn assess_module(
        &self,
        facts: &ModuleFacts,
        arch: Option<&ArchContext>,
    ) -> QualityAssessment {
        let module_path = if facts.path.is_empty() {
            "unknown".to_string()
        } else {
            facts.path.clone()
        };

        let metrics = metrics::score_module(facts, &self.config.weights);
        let score = overall_score(&metrics);
        let quality_level = determine_level(score, &self.config.thresholds);

        let vector_similarity_score = self
            .similarity
            .as_ref()
            .map(|p| p.similarity(&facts.content))
            .unwrap_or(0.0);

        let arch_summary = arch.map(|a| a.summary()).unwrap_or_default();
        let llm_assessment = match self.enhancer.enhance_assessment(
            &module_path,
            &metrics,
            &facts.content,
            &arch_summary,
        ) {
            Ok(map) => map,
            Err(e) => {
                error!("LLM assessment failed for {}: {}", module_path, e);
                fallback_assessment(&metrics)
            }
        };

        let recommendations = module_recommendations(&metrics, &llm_assessment);

        QualityAssessment {
            module_path,
            overall_score: score,
            quality_level,
            metrics,
            vector_similarity_score,
            llm_assessment,
            timestamp: now_iso8601(),
            recommendations,
        }
    }

    /// Run the full pipeline over an upstream analysis document.
    ///
    /// Malformed module entries (bare strings, wrong shapes) are logged
    /// and skipped. `history` carries prior snapshots for trend
    /// classification; pass an empty slice when unavailable.
    pub fn run(
        &self,
        analysis: &CodeAnalysis,
        arch: Option<&ArchContext>,
        history: &[TrendSnapshot],
    ) -> QualityReport {
        info!("starting quality scoring over {} module entries", analysis.modules.len());

        let mut assessments: Vec<QualityAssessment> = Vec::new();
        for entry in &analysis.modules {
            match entry {
                Value::String(s) => {
                    warn!("module entry {:?} is a string, expected object; skipping", s);
                }
                Value::Object(_) => {
                    match serde_json::from_value::<ModuleFacts>(entry.clone()) {
                        Ok(facts) => assessments.push(self.assess_module(&facts, arch)),
                        Err(e) => warn!("skipping malformed module entry: {}", e),
                    }
                }
                other => {
                    warn!("module entry has unexpected type {:?}; skipping", other);
                }
            }
        }

        let timestamp = now_iso8601();
        let overview = rollup::build_overview(&assessments);
        let quality_distribution = rollup::build_distribution(&assessments);
        let recommendations = rollup::global_recommendations(&assessments);
        let trends = rollup::build_trends(&assessments, history, &timestamp);
        let insights = rollup::build_insights(&overview);

        let metadata = ReportMetadata {
            analyzer_version: env!("CARGO_PKG_VERSION").to_string(),
            analysis_timestamp: timestamp,
            total_modules_analyzed: assessments.len(),
            embeddings_enabled: self.similarity.is_some(),
            llm_enabled: self.enhancer.is_enabled(),
        };

        info!("quality analysis complete: {} modules assessed", assessments.len());

        let module_assessments: BTreeMap<String, QualityAssessment> = assessments
            .into_iter()
            .map(|a| (a.module_path.clone(), a))
            .collect();

        QualityReport {
            overview,
            module_assessments,
            quality_distribution,
            recommendations,
            trends,
            insights,
            metadata,
        }
    }
}
