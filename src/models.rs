//! Core data models for critiq
//!
//! These models are used throughout the codebase for representing
//! structural facts received from the upstream parser, per-module
//! quality assessments, and the repository-wide report envelope.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Discrete quality classification derived from an overall score.
///
/// Ordered worst-to-best so that `Ord` comparisons read naturally.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    #[default]
    Critical,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl QualityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLevel::Excellent => "excellent",
            QualityLevel::Good => "good",
            QualityLevel::Fair => "fair",
            QualityLevel::Poor => "poor",
            QualityLevel::Critical => "critical",
        }
    }

    /// All levels, best first. Matches the top-down threshold evaluation order.
    pub fn all() -> [QualityLevel; 5] {
        [
            QualityLevel::Excellent,
            QualityLevel::Good,
            QualityLevel::Fair,
            QualityLevel::Poor,
            QualityLevel::Critical,
        ]
    }
}

impl std::fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One scored quality dimension for a module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityMetric {
    /// Human-readable metric name (e.g. "Complexity")
    pub name: String,
    /// Normalized score, always within `0.0..=1.0`
    pub score: f64,
    /// Contribution of this metric to the overall score
    pub weight: f64,
    /// Static description of what the metric measures
    pub description: String,
    /// Raw measurements backing the score (counts, ratios, names)
    #[serde(default)]
    pub details: Map<String, Value>,
    /// Actionable remarks, in emission order
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl QualityMetric {
    pub fn new(
        name: impl Into<String>,
        score: f64,
        weight: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            score: score.clamp(0.0, 1.0),
            weight,
            description: description.into(),
            details: Map::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }
}

/// Complete quality assessment for one module.
///
/// Created once per module per analysis run and not mutated afterwards;
/// persistence is the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub module_path: String,
    /// Weight-normalized sum of metric scores; 0.0 for an empty metric set
    pub overall_score: f64,
    pub quality_level: QualityLevel,
    pub metrics: BTreeMap<String, QualityMetric>,
    /// 0.0 when the optional embedding comparison is disabled
    pub vector_similarity_score: f64,
    /// Narrative assessment from the LLM, or the deterministic fallback
    pub llm_assessment: Map<String, Value>,
    /// Creation time, ISO-8601
    pub timestamp: String,
    /// Deduplicated union of metric suggestions and LLM priorities
    pub recommendations: Vec<String>,
}

/// Structural facts for one function, as supplied by the upstream parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionFact {
    pub name: String,
    /// Cyclomatic complexity computed upstream; 1 when absent
    #[serde(default = "default_complexity")]
    pub complexity: u32,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub decorators: Vec<String>,
    #[serde(default)]
    pub docstring: Option<String>,
}

fn default_complexity() -> u32 {
    1
}

/// Structural facts for one class.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassFact {
    pub name: String,
    #[serde(default)]
    pub bases: Vec<String>,
    #[serde(default)]
    pub decorators: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
}

/// Structural facts for one module: the unit of quality scoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleFacts {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub name: String,
    /// Full raw source text
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub functions: Vec<FunctionFact>,
    #[serde(default)]
    pub classes: Vec<ClassFact>,
}

/// Top-level input document from the upstream structural parser.
///
/// Module entries are kept as raw values here: upstream occasionally
/// emits bare strings instead of structured records, and intake must
/// skip those without failing the run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodeAnalysis {
    #[serde(default)]
    pub modules: Vec<Value>,
}

/// An HTTP endpoint detected by the enhanced-analysis collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub method: String,
}

/// Optional architectural context from the enhanced-analysis collaborator.
///
/// Used only to enrich the LLM prompt; absence degrades to an empty
/// context string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchContext {
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub ml_models: Vec<String>,
}

impl ArchContext {
    /// Render a short context block for prompt injection.
    /// Empty string when nothing was detected upstream.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.endpoints.is_empty() {
            let eps: Vec<String> = self
                .endpoints
                .iter()
                .take(8)
                .map(|e| format!("{} {}", e.method, e.path))
                .collect();
            parts.push(format!("Endpoints: {}", eps.join(", ")));
        }
        if !self.patterns.is_empty() {
            parts.push(format!(
                "Architecture patterns: {}",
                self.patterns
                    .iter()
                    .take(6)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        if !self.components.is_empty() {
            parts.push(format!(
                "Components: {}",
                self.components
                    .iter()
                    .take(8)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        if !self.ml_models.is_empty() {
            parts.push(format!(
                "ML models: {}",
                self.ml_models
                    .iter()
                    .take(4)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        parts.join("\n")
    }
}

/// Repository-level score statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Overview {
    pub average_quality_score: f64,
    pub median_quality_score: f64,
    pub quality_std_dev: f64,
    pub total_modules: usize,
    pub quality_level_distribution: BTreeMap<String, usize>,
    pub top_quality_modules: Vec<String>,
    pub lowest_quality_modules: Vec<String>,
}

/// Per-metric spread across all modules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricSpread {
    pub average: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Distribution of metric scores and quality levels across modules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityDistribution {
    pub metric_averages: BTreeMap<String, MetricSpread>,
    pub quality_ranges: BTreeMap<String, usize>,
}

/// One point-in-time snapshot used for trend classification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendSnapshot {
    pub timestamp: String,
    pub total_modules: usize,
    pub average_score: f64,
}

/// Direction of the quality trend across snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

/// Trend section of the report. Without caller-supplied history this is
/// a single current snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trends {
    pub current_snapshot: TrendSnapshot,
    pub direction: TrendDirection,
    pub trend_strength: f64,
    pub observations: Vec<String>,
}

/// Deterministic codebase-health narrative derived from the overview.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Insights {
    pub health_assessment: String,
    pub health_score: f64,
    pub critical_areas: Vec<String>,
    pub strategic_recommendations: Vec<String>,
}

/// Report provenance and feature flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub analyzer_version: String,
    pub analysis_timestamp: String,
    pub total_modules_analyzed: usize,
    pub embeddings_enabled: bool,
    pub llm_enabled: bool,
}

/// The full repository quality report: the output envelope consumed by
/// reporters and downstream renderers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub overview: Overview,
    pub module_assessments: BTreeMap<String, QualityAssessment>,
    pub quality_distribution: QualityDistribution,
    pub recommendations: Vec<String>,
    pub trends: Trends,
    pub insights: Insights,
    pub metadata: ReportMetadata,
}

/// ISO-8601 timestamp for "now". Single definition so every model stamps
/// time the same way.
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339()
}
