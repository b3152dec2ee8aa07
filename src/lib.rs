//! critiq - LLM-assisted code quality scoring
//!
//! A quality scoring pipeline over pre-extracted structural facts:
//! seven deterministic metric scorers, a repository-wide aggregator, and
//! an optional LLM assessment client with caching, retries, and
//! multi-strategy response recovery.
//!
//! The upstream structural parser, documentation renderers, and
//! embedding store are external collaborators; this crate consumes their
//! JSON contracts and produces the repository quality report.

pub mod assess;
pub mod cli;
pub mod config;
pub mod llm;
pub mod metrics;
pub mod models;
pub mod reporters;
