//! JSON reporter
//!
//! Outputs the full QualityReport as pretty-printed JSON. Useful for
//! machine consumption, piping to jq, or the documentation renderers
//! downstream.

use crate::models::QualityReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &QualityReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render report as compact JSON (single line)
#[allow(dead_code)] // Public API helper
pub fn render_compact(report: &QualityReport) -> Result<String> {
    Ok(serde_json::to_string(report)?)
}
