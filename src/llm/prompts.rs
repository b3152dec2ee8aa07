//! Prompt construction for the consolidated quality assessment
//!
//! One call per module instead of four: the prompt requests the overall
//! assessment, code review, pattern/SOLID analysis, and security review
//! as named sub-objects of a single JSON document.

use crate::models::QualityMetric;
use std::collections::BTreeMap;

/// System prompt for all quality assessment calls.
pub const SYSTEM_PROMPT: &str = "You are a senior software engineer and code quality expert. \
Provide detailed, actionable quality assessments. Return concise, structured JSON responses.";

/// Format the metric summary block: one line per metric with score,
/// weight, and description.
pub fn format_metrics_summary(metrics: &BTreeMap<String, QualityMetric>) -> String {
    metrics
        .values()
        .map(|m| {
            format!(
                "- {}: {:.2} (weight: {:.0}%) - {}",
                m.name,
                m.score,
                m.weight * 100.0,
                m.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Truncate module content to the preview cap, on a char boundary.
fn content_preview(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        content.to_string()
    } else {
        let preview: String = content.chars().take(max_chars).collect();
        format!("{}...", preview)
    }
}

/// Build the consolidated per-module prompt.
///
/// `arch_context` is the optional summary from the enhanced-analysis
/// collaborator; pass an empty string when unavailable.
pub fn build_consolidated_prompt(
    module_path: &str,
    metrics: &BTreeMap<String, QualityMetric>,
    content: &str,
    arch_context: &str,
    preview_chars: usize,
) -> String {
    let metrics_summary = format_metrics_summary(metrics);
    let preview = content_preview(content, preview_chars);

    let context_block = if arch_context.is_empty() {
        String::new()
    } else {
        format!("\nArchitectural Context:\n{}\n", arch_context)
    };

    format!(
        r#"Analyze the following code quality metrics and module source, and provide a complete quality assessment.

Metrics:
{metrics_summary}

Module Information:
- Path: {module_path}
{context_block}
Content Preview:
{preview}

Provide, in one response:
1. An overall quality assessment (1-2 sentences), top 3 strengths, top 3 weaknesses, and improvement priorities ranked highest first
2. A code review: structure, best practices, potential issues, maintainability, performance
3. A design pattern and SOLID principles analysis
4. A security assessment

Format your response as a single JSON document:
{{
  "overall_assessment": "Brief overall assessment",
  "strengths": ["strength1", "strength2", "strength3"],
  "weaknesses": ["weakness1", "weakness2", "weakness3"],
  "improvement_priority": ["priority1", "priority2", "priority3"],
  "confidence": 0.85,
  "code_review": {{
    "review_summary": "Overall review summary",
    "structure_analysis": "Code structure assessment",
    "best_practices": ["practice1", "practice2"],
    "potential_issues": ["issue1", "issue2"],
    "maintainability_score": 0.75,
    "performance_notes": "Performance assessment",
    "recommendations": ["rec1", "rec2"]
  }},
  "pattern_analysis": {{
    "pattern_assessment": "Overall pattern usage assessment",
    "solid_principles": {{
      "single_responsibility": 0.8,
      "open_closed": 0.7,
      "liskov_substitution": 0.9,
      "interface_segregation": 0.6,
      "dependency_inversion": 0.8
    }},
    "coupling_analysis": "Coupling assessment",
    "cohesion_analysis": "Cohesion assessment",
    "architectural_notes": "Architecture quality notes"
  }},
  "security_assessment": {{
    "security_score": 0.85,
    "vulnerabilities": ["vuln1"],
    "security_strengths": ["strength1"],
    "security_recommendations": ["rec1"],
    "risk_level": "low|medium|high|critical"
  }}
}}

Return ONLY valid JSON."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metrics() -> BTreeMap<String, QualityMetric> {
        let mut metrics = BTreeMap::new();
        metrics.insert(
            "complexity".to_string(),
            QualityMetric::new("Complexity", 0.75, 0.2, "Cyclomatic complexity analysis"),
        );
        metrics.insert(
            "security".to_string(),
            QualityMetric::new("Security", 0.9, 0.1, "Security assessment"),
        );
        metrics
    }

    #[test]
    fn test_metrics_summary_format() {
        let summary = format_metrics_summary(&sample_metrics());
        assert!(summary.contains("- Complexity: 0.75 (weight: 20%)"));
        assert!(summary.contains("- Security: 0.90 (weight: 10%)"));
    }

    #[test]
    fn test_content_preview_respects_cap() {
        let long = "x".repeat(5_000);
        let preview = content_preview(&long, 2_000);
        assert_eq!(preview.chars().count(), 2_003); // 2000 + "..."
        assert!(preview.ends_with("..."));

        let short = "short content";
        assert_eq!(content_preview(short, 2_000), short);
    }

    #[test]
    fn test_preview_cap_is_char_safe() {
        // Multibyte content must not be split mid-char
        let content = "é".repeat(3_000);
        let preview = content_preview(&content, 2_000);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_prompt_includes_sections() {
        let prompt = build_consolidated_prompt(
            "src/app.py",
            &sample_metrics(),
            "def f():\n    pass\n",
            "",
            2_000,
        );
        assert!(prompt.contains("src/app.py"));
        assert!(prompt.contains("\"overall_assessment\""));
        assert!(prompt.contains("\"code_review\""));
        assert!(prompt.contains("\"pattern_analysis\""));
        assert!(prompt.contains("\"security_assessment\""));
        assert!(prompt.contains("Return ONLY valid JSON."));
        assert!(!prompt.contains("Architectural Context"));
    }

    #[test]
    fn test_prompt_includes_arch_context_when_present() {
        let prompt = build_consolidated_prompt(
            "src/api.py",
            &sample_metrics(),
            "",
            "Endpoints: GET /api/users",
            2_000,
        );
        assert!(prompt.contains("Architectural Context:"));
        assert!(prompt.contains("GET /api/users"));
    }
}
