//! Multi-strategy JSON recovery for LLM responses
//!
//! The service returns free text that should be JSON but may arrive
//! wrapped in code fences, prefixed with prose, or mangled. Strategies
//! are tried in order until one yields a JSON object; the chain
//! terminates in an empty mapping and never errors.

use serde_json::{Map, Value};
use tracing::debug;

/// Introductory phrases models prepend despite instructions.
const INTRO_PHRASES: [&str; 6] = [
    "here's the json",
    "here is the json",
    "json response:",
    "response:",
    "json:",
    "output:",
];

/// Parse a raw LLM response, attempting each recovery strategy in order.
/// Returns an empty map when nothing parses; callers treat that as
/// "assessment unavailable", not as an error.
pub fn parse_with_recovery(text: &str) -> Map<String, Value> {
    let strategies: [(&str, fn(&str) -> Option<Map<String, Value>>); 5] = [
        ("direct", parse_direct),
        ("code_fence", parse_stripped_fences),
        ("brace_substring", parse_brace_substring),
        ("intro_phrase", parse_after_intro_phrase),
        ("balanced_scan", parse_balanced_candidates),
    ];

    for (name, strategy) in strategies {
        if let Some(map) = strategy(text) {
            if name != "direct" {
                debug!("recovered JSON response via {} strategy", name);
            }
            return map;
        }
    }

    debug!("all recovery strategies failed; returning empty assessment");
    Map::new()
}

fn as_object(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Strategy 1: the response is already valid JSON.
fn parse_direct(text: &str) -> Option<Map<String, Value>> {
    serde_json::from_str::<Value>(text.trim()).ok().and_then(as_object)
}

/// Strategy 2: strip markdown code-fence markers and retry.
fn parse_stripped_fences(text: &str) -> Option<Map<String, Value>> {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    parse_direct(cleaned)
}

/// Strategy 3: parse the substring from the first `{` to the last `}`.
fn parse_brace_substring(text: &str) -> Option<Map<String, Value>> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_direct(&text[start..=end])
}

/// Strategy 4: skip a known introductory phrase, then retry the direct
/// and brace-substring heuristics on the remainder.
fn parse_after_intro_phrase(text: &str) -> Option<Map<String, Value>> {
    let lower = text.to_lowercase();
    for phrase in INTRO_PHRASES {
        if let Some(pos) = lower.find(phrase) {
            let remainder = &text[pos + phrase.len()..];
            if let Some(map) = parse_direct(remainder).or_else(|| parse_brace_substring(remainder))
            {
                return Some(map);
            }
        }
    }
    None
}

/// Strategy 5: scan for brace-balanced candidate substrings and return
/// the first one that parses.
fn parse_balanced_candidates(text: &str) -> Option<Map<String, Value>> {
    for candidate in brace_candidates(text) {
        if let Some(map) = parse_direct(candidate) {
            return Some(map);
        }
    }
    None
}

/// All brace-balanced substrings starting at each `{`, respecting string
/// literals so braces inside quoted values do not affect depth.
fn brace_candidates(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut candidates = Vec::new();

    let mut start_indices: Vec<usize> = Vec::new();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'{' {
            start_indices.push(i);
        }
    }

    for &start in &start_indices {
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (offset, &b) in bytes[start..].iter().enumerate() {
            if escaped {
                escaped = false;
                continue;
            }
            match b {
                b'\\' if in_string => escaped = true,
                b'"' => in_string = !in_string,
                b'{' if !in_string => depth += 1,
                b'}' if !in_string => {
                    depth -= 1;
                    if depth == 0 {
                        candidates.push(&text[start..=start + offset]);
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    candidates
}
