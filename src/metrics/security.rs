//! Security scorer
//!
//! Counts security anti-patterns against defensive practices. Heavier
//! penalty for issues than credit for practices; the practice bonus is
//! capped so good hygiene cannot mask real issues.

use crate::metrics::patterns;
use crate::models::{ModuleFacts, QualityMetric};
use serde_json::{json, Map, Value};

pub fn score(facts: &ModuleFacts, weight: f64) -> QualityMetric {
    let content = facts.content.as_str();

    let eval_usage = patterns::eval_call().find_iter(content).count();
    let exec_usage = patterns::exec_call().find_iter(content).count();
    let shell_injection = patterns::shell_injection().find_iter(content).count();
    let hardcoded_secrets = patterns::hardcoded_secret().find_iter(content).count();
    let sql_injection = patterns::sql_concat().find_iter(content).count();

    let input_validation = patterns::input_validation().find_iter(content).count();
    let exception_handling = patterns::exception_handling().find_iter(content).count();
    let logging_usage = patterns::logging_call().find_iter(content).count();

    let total_issues = eval_usage + exec_usage + shell_injection + hardcoded_secrets + sql_injection;
    let total_practices = input_validation + exception_handling + logging_usage;

    let issue_penalty = (total_issues as f64 * 0.2).min(1.0);
    let practice_bonus = (total_practices as f64 * 0.1).min(0.5);
    let security_score = (1.0 - issue_penalty + practice_bonus).clamp(0.0, 1.0);

    let mut suggestions = Vec::new();
    if eval_usage > 0 {
        suggestions.push("Avoid using eval() - security risk".to_string());
    }
    if hardcoded_secrets > 0 {
        suggestions.push("Remove hardcoded passwords/API keys".to_string());
    }
    if shell_injection > 0 {
        suggestions.push("Avoid shell=True in subprocess calls".to_string());
    }

    let mut issues = Map::new();
    issues.insert("eval_usage".to_string(), json!(eval_usage));
    issues.insert("exec_usage".to_string(), json!(exec_usage));
    issues.insert("shell_injection".to_string(), json!(shell_injection));
    issues.insert("hardcoded_secrets".to_string(), json!(hardcoded_secrets));
    issues.insert("sql_injection".to_string(), json!(sql_injection));

    let mut practices = Map::new();
    practices.insert("input_validation".to_string(), json!(input_validation));
    practices.insert("exception_handling".to_string(), json!(exception_handling));
    practices.insert("logging_usage".to_string(), json!(logging_usage));

    QualityMetric::new(
        "Security",
        security_score,
        weight,
        "Security practices and vulnerability assessment",
    )
    .with_detail("security_issues", Value::Object(issues))
    .with_detail("security_practices", Value::Object(practices))
    .with_detail("total_issues", total_issues)
    .with_detail("total_practices", total_practices)
    .with_suggestions(suggestions)
}
