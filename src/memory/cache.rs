//! Search-result cache backing the semantic fallback.

use std::fmt;
use std::num::NonZeroUsize;

use chrono::{DateTime, Utc};
use lru::LruCache;
use tracing::debug;

use crate::models::{FileInfo, SearchHits};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchCacheEntry {
    pub results: SearchHits,
    pub timestamp: DateTime<Utc>,
    pub files: Vec<FileInfo>,
}

impl SearchCacheEntry {
    pub fn new(results: SearchHits) -> Self {
        let files = results.files.iter().map(|p| FileInfo::from_path(p)).collect();
        Self { results, timestamp: Utc::now(), files }
    }
}

/// Build the cache key: the path exactly as given, then the lowercased keyword
///
/// The path is not normalized, so two spellings of one directory produce two keys.
pub fn cache_key(path: &str, keyword: &str) -> String {
    format!("{}:{}", path, keyword.to_lowercase())
}

/// Insertion-ordered map of cache entries
///
/// Overwriting a key keeps its original position, so scans visit entries in the
/// order their keys were first seen. Reads never reorder, so a bounded cache evicts
/// the oldest inserted key. A capacity of 0 is treated as 1.
pub struct SearchCache {
    entries: LruCache<String, SearchCacheEntry>,
}

impl SearchCache {
    pub fn new(capacity: Option<usize>) -> Self {
        let entries = match capacity {
            Some(cap) => LruCache::new(NonZeroUsize::new(cap).unwrap_or(NonZeroUsize::MIN)),
            None => LruCache::unbounded(),
        };
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&SearchCacheEntry> {
        self.entries.peek(key)
    }

    pub fn insert(&mut self, key: String, entry: SearchCacheEntry) {
        if let Some(slot) = self.entries.peek_mut(&key) {
            *slot = entry;
            return;
        }
        if let Some((evicted, _)) = self.entries.push(key, entry) {
            debug!(key = %evicted, "evicted search cache entry");
        }
    }

    /// Entries whose key contains `path` as a substring, oldest first
    pub fn matching<'a>(
        &'a self,
        path: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a SearchCacheEntry)> + 'a {
        self.entries.iter().rev().filter(move |(k, _)| k.contains(path)).map(|(k, e)| (k.as_str(), e))
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for SearchCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchCache")
            .field("len", &self.entries.len())
            .field("cap", &self.entries.cap())
            .finish()
    }
}
