//! CLI command definitions and handlers

mod analyze;
mod init;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// critiq - LLM-assisted code quality scoring
#[derive(Parser, Debug)]
#[command(name = "critiq")]
#[command(
    version,
    about = "Score source modules on seven quality metrics, with an optional LLM narrative",
    long_about = "critiq consumes the structural-facts JSON produced by an upstream code \
parser and scores every module on complexity, documentation, maintainability, \
testability, design patterns, code style, and security. With an API key configured \
it enhances each module with a model-generated narrative assessment; without one it \
falls back to a deterministic assessment derived from the same metrics.",
    after_help = "\
Examples:
  critiq analyze facts.json                      Analyze with default settings
  critiq analyze facts.json --format json        JSON output for scripting
  critiq analyze facts.json --no-llm             Deterministic assessment only
  critiq analyze facts.json --fail-below 0.6     Exit 1 if average score drops (CI mode)
  critiq init                                    Write an example critiq.toml"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a critiq.toml config file with example settings
    Init,

    /// Score all modules in a structural-facts document
    Analyze {
        /// Structural-facts JSON from the upstream parser ("-" for stdin)
        input: PathBuf,

        /// Output format: text, json, markdown (or md)
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Config file path (default: ./critiq.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Enhanced-analysis JSON with architectural context for prompts
        #[arg(long)]
        arch_context: Option<PathBuf>,

        /// Prior trend snapshots JSON for trend classification
        #[arg(long)]
        history: Option<PathBuf>,

        /// Skip the LLM call and use the deterministic fallback
        #[arg(long)]
        no_llm: bool,

        /// Exit with code 1 when the average score is below this value
        #[arg(long)]
        fail_below: Option<f64>,
    },
}

/// Dispatch a parsed CLI invocation
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init => init::run(),
        Commands::Analyze {
            input,
            format,
            output,
            config,
            arch_context,
            history,
            no_llm,
            fail_below,
        } => analyze::run(analyze::AnalyzeArgs {
            input,
            format,
            output,
            config,
            arch_context,
            history,
            no_llm,
            fail_below,
        }),
    }
}
