//! `critiq analyze` - run the quality scoring pipeline

use crate::assess::QualityPipeline;
use crate::config::{QualityConfig, UserConfig};
use crate::llm::{LlmBackend, LlmClient, LlmError, QualityEnhancer, ResponseCache};
use crate::models::{ArchContext, CodeAnalysis, TrendSnapshot};
use crate::reporters::{self, OutputFormat};
use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct AnalyzeArgs {
    pub input: PathBuf,
    pub format: String,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub arch_context: Option<PathBuf>,
    pub history: Option<PathBuf>,
    pub no_llm: bool,
    pub fail_below: Option<f64>,
}

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => QualityConfig::load(path)?,
        None => QualityConfig::load(Path::new("critiq.toml"))?,
    };

    let enhancer = build_enhancer(&config, args.no_llm)?;
    let pipeline = QualityPipeline::new(config, enhancer);

    let analysis: CodeAnalysis = read_json(&args.input).context("reading structural facts")?;

    let arch: Option<ArchContext> = match &args.arch_context {
        Some(path) => Some(read_json(path).context("reading architectural context")?),
        None => None,
    };

    let history: Vec<TrendSnapshot> = match &args.history {
        Some(path) => read_json(path).context("reading trend history")?,
        None => Vec::new(),
    };

    let report = pipeline.run(&analysis, arch.as_ref(), &history);

    let format: OutputFormat = args.format.parse()?;
    let rendered = reporters::render(&report, format)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("writing report to {}", path.display()))?;
            info!("report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    if let Some(threshold) = args.fail_below {
        let average = report.overview.average_quality_score;
        if average < threshold {
            eprintln!(
                "quality gate failed: average score {:.2} is below {:.2}",
                average, threshold
            );
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Build the enhancer from config. A missing API key degrades to the
/// deterministic fallback path instead of failing the run.
fn build_enhancer(config: &QualityConfig, no_llm: bool) -> Result<QualityEnhancer> {
    if no_llm || !config.llm.enabled {
        return Ok(QualityEnhancer::disabled());
    }

    let Some(backend) = LlmBackend::parse(&config.llm.backend) else {
        warn!(
            "unknown LLM backend '{}'; falling back to deterministic assessment",
            config.llm.backend
        );
        return Ok(QualityEnhancer::disabled());
    };

    let user = UserConfig::load()?;
    let client = match LlmClient::from_user_config(backend, config.llm.model.clone(), &user) {
        Ok(client) => client,
        Err(LlmError::MissingApiKey { env_var }) => {
            warn!(
                "{} not configured; falling back to deterministic assessment",
                env_var
            );
            return Ok(QualityEnhancer::disabled());
        }
        Err(e) => return Err(e.into()),
    };

    let cache = if config.cache.enabled {
        ResponseCache::new(config.cache.dir.clone(), config.cache.ttl_hours)
    } else {
        None
    };

    Ok(QualityEnhancer::new(
        Box::new(client),
        cache,
        config.retry.clone(),
        config.llm.content_preview_chars,
    ))
}

/// Read and deserialize a JSON document from a file, or stdin for "-".
fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&content)
        .with_context(|| format!("invalid JSON in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_enhancer_no_llm_flag() {
        let enhancer = build_enhancer(&QualityConfig::default(), true).unwrap();
        assert!(!enhancer.is_enabled());
    }

    #[test]
    fn test_build_enhancer_disabled_in_config() {
        let mut config = QualityConfig::default();
        config.llm.enabled = false;
        let enhancer = build_enhancer(&config, false).unwrap();
        assert!(!enhancer.is_enabled());
    }

    #[test]
    fn test_build_enhancer_unknown_backend_degrades() {
        let mut config = QualityConfig::default();
        config.llm.backend = "mystery".to_string();
        let enhancer = build_enhancer(&config, false).unwrap();
        assert!(!enhancer.is_enabled());
    }

    #[test]
    fn test_read_json_reports_bad_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("facts.json");
        std::fs::write(&path, "{ not json").unwrap();
        let result: Result<CodeAnalysis> = read_json(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_read_json_parses_facts() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("facts.json");
        std::fs::write(&path, r#"{"modules": [{"path": "a.py"}]}"#).unwrap();
        let analysis: CodeAnalysis = read_json(&path).unwrap();
        assert_eq!(analysis.modules.len(), 1);
    }
}
