//! Filesystem cache for LLM responses
//!
//! One `<sha256 hex>.json` file per (model, prompt) pair. Entries carry
//! their own timestamp and expire after a configurable TTL; an expired
//! entry is deleted on the next read and treated as a miss. The cache is
//! shared across runs and processes with no locking — concurrent writers
//! race last-writer-wins on idempotent content, which is acceptable.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Version segment baked into every key so a format change invalidates
/// old entries without a migration.
const KEY_VERSION: &str = "critiq-llm-v1";

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    response: String,
    timestamp: String,
    model: String,
}

/// Filesystem-backed response cache.
pub struct ResponseCache {
    dir: PathBuf,
    ttl_hours: u64,
}

impl ResponseCache {
    /// Create a cache rooted at `dir`, creating the directory if needed.
    /// Returns None (cache disabled) when the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>, ttl_hours: u64) -> Option<Self> {
        let dir = dir.into();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!("could not create cache directory {}: {}", dir.display(), e);
            return None;
        }
        Some(Self { dir, ttl_hours })
    }

    /// Stable key for a (model, prompt) pair.
    pub fn key(model: &str, prompt: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(KEY_VERSION.as_bytes());
        hasher.update(b"|");
        hasher.update(model.as_bytes());
        hasher.update(b"|");
        hasher.update(prompt.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Look up a cached response. Expired or unreadable entries are
    /// removed and reported as misses.
    pub fn get(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key);
        if !path.exists() {
            return None;
        }

        let entry = match std::fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str::<CacheEntry>(&content).ok())
        {
            Some(entry) => entry,
            None => {
                warn!("removing unreadable cache entry {}", path.display());
                remove_quietly(&path);
                return None;
            }
        };

        if self.is_expired(&entry.timestamp) {
            debug!("cache entry expired: {}", path.display());
            remove_quietly(&path);
            return None;
        }

        debug!("cache hit for key {}...", &key[..8.min(key.len())]);
        Some(entry.response)
    }

    /// Persist a response. Failures are logged and swallowed — a cold
    /// cache is a performance problem, not a correctness one.
    pub fn put(&self, key: &str, model: &str, response: &str) {
        let entry = CacheEntry {
            response: response.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            model: model.to_string(),
        };
        let path = self.entry_path(key);
        let serialized = match serde_json::to_string(&entry) {
            Ok(s) => s,
            Err(e) => {
                warn!("failed to serialize cache entry: {}", e);
                return;
            }
        };
        if let Err(e) = std::fs::write(&path, serialized) {
            warn!("failed to write cache entry {}: {}", path.display(), e);
        }
    }

    fn is_expired(&self, timestamp: &str) -> bool {
        let Ok(written) = DateTime::parse_from_rfc3339(timestamp) else {
            return true;
        };
        let age = Utc::now().signed_duration_since(written.with_timezone(&Utc));
        age > Duration::hours(self.ttl_hours as i64)
    }

    #[cfg(test)]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn remove_quietly(path: &Path) {
    let _ = std::fs::remove_file(path);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_stable_and_distinct() {
        let a = ResponseCache::key("gpt-4o-mini", "prompt one");
        let b = ResponseCache::key("gpt-4o-mini", "prompt one");
        let c = ResponseCache::key("gpt-4o-mini", "prompt two");
        let d = ResponseCache::key("other-model", "prompt one");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_eq!(a.len(), 64); // sha256 hex
    }

    #[test]
    fn test_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(tmp.path().join("cache"), 24).unwrap();

        let key = ResponseCache::key("m", "p");
        assert!(cache.get(&key).is_none());

        cache.put(&key, "m", "{\"ok\": true}");
        assert_eq!(cache.get(&key).as_deref(), Some("{\"ok\": true}"));
    }

    #[test]
    fn test_expired_entry_is_miss_and_deleted() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(tmp.path().join("cache"), 24).unwrap();

        let key = ResponseCache::key("m", "p");
        // Write an entry stamped 25 hours in the past
        let old = (Utc::now() - Duration::hours(25)).to_rfc3339();
        let entry = format!(
            r#"{{"response": "stale", "timestamp": "{}", "model": "m"}}"#,
            old
        );
        let path = cache.dir().join(format!("{}.json", key));
        std::fs::write(&path, entry).unwrap();

        assert!(cache.get(&key).is_none());
        assert!(!path.exists(), "expired entry should be deleted on read");
    }

    #[test]
    fn test_fresh_entry_within_ttl() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(tmp.path().join("cache"), 24).unwrap();

        let key = ResponseCache::key("m", "p");
        let recent = (Utc::now() - Duration::hours(23)).to_rfc3339();
        let entry = format!(
            r#"{{"response": "fresh", "timestamp": "{}", "model": "m"}}"#,
            recent
        );
        std::fs::write(cache.dir().join(format!("{}.json", key)), entry).unwrap();

        assert_eq!(cache.get(&key).as_deref(), Some("fresh"));
    }

    #[test]
    fn test_corrupt_entry_is_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(tmp.path().join("cache"), 24).unwrap();

        let key = ResponseCache::key("m", "p");
        let path = cache.dir().join(format!("{}.json", key));
        std::fs::write(&path, "not json at all").unwrap();

        assert!(cache.get(&key).is_none());
        assert!(!path.exists());
    }
}
