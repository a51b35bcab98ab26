//! Conversation history and search-result cache.
//!
//! # Concurrency
//!
//! The store is shared across requests (foreground commands and any background
//! listener feeding the same engine), so all state sits behind a single [`Mutex`].
//! Every public operation takes the lock once, which rules out lost history
//! appends and torn cache reads. A poisoned lock is recovered rather than
//! propagated: the guarded data is plain collections and stays consistent.
//!
//! # Retention
//!
//! - History is capped ([`EngineConfig::history_cap`]); the oldest interaction is
//!   dropped first and the rest keep their order.
//! - The search cache never expires. Without [`EngineConfig::cache_capacity`] it grows
//!   for the life of the process.

pub mod cache;

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;
use tracing::debug;

use crate::config::EngineConfig;
use crate::models::{FileInfo, Interaction, SearchHits};
use crate::similarity::{similarity, tokenize};
pub use cache::{SearchCache, SearchCacheEntry, cache_key};

const NO_HISTORY: &str = "No previous conversation.";

#[derive(Debug)]
struct MemoryState {
    history: VecDeque<Interaction>,
    cache: SearchCache,
}

#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    history_cap: usize,
    context_window: usize,
}

impl MemoryStore {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                history: VecDeque::with_capacity(config.history_cap),
                cache: SearchCache::new(config.cache_capacity),
            }),
            history_cap: config.history_cap,
            context_window: config.context_window,
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append a completed request, evicting the oldest once over the cap
    pub fn add_interaction(&self, user_input: &str, agent_response: Value, command_result: Value) {
        let interaction = Interaction::new(user_input, agent_response, command_result);
        let mut state = self.lock();
        state.history.push_back(interaction);
        while state.history.len() > self.history_cap {
            state.history.pop_front();
            debug!(cap = self.history_cap, "trimmed conversation history");
        }
    }

    /// Snapshot of the history, oldest first
    pub fn history(&self) -> Vec<Interaction> {
        self.lock().history.iter().cloned().collect()
    }

    pub fn history_len(&self) -> usize {
        self.lock().history.len()
    }

    /// Render the most recent interactions for the intent parser
    ///
    /// ```text
    /// Previous conversation:
    /// User: <input>
    /// Agent: <intent JSON>
    /// Result: Error - <message>      (only when the request failed)
    /// ---
    /// ```
    pub fn get_context(&self) -> String {
        let state = self.lock();
        if state.history.is_empty() {
            return NO_HISTORY.to_string();
        }

        let skip = state.history.len().saturating_sub(self.context_window);
        let mut context = String::from("Previous conversation:\n");
        for interaction in state.history.iter().skip(skip) {
            context.push_str(&format!("User: {}\n", interaction.user_input));
            context.push_str(&format!("Agent: {}\n", interaction.agent_response));
            if let Some(error) = interaction.error() {
                context.push_str(&format!("Result: Error - {}\n", error));
            }
            context.push_str("---\n");
        }
        context
    }

    /// Store (or overwrite) the results of a search under (path, keyword)
    pub fn cache_search_results(&self, path: &str, keyword: &str, results: &SearchHits) {
        let key = cache_key(path, keyword);
        let entry = SearchCacheEntry::new(results.clone());
        debug!(key = %key, files = entry.files.len(), "cached search results");
        self.lock().cache.insert(key, entry);
    }

    pub fn cached_search(&self, path: &str, keyword: &str) -> Option<SearchCacheEntry> {
        self.lock().cache.get(&cache_key(path, keyword)).cloned()
    }

    pub fn cache_len(&self) -> usize {
        self.lock().cache.len()
    }

    /// Best previously seen file under `path` whose name resembles `query`
    ///
    /// Scans every cache entry whose key contains `path`, scoring the query tokens
    /// against each file's name without extension. Only a score strictly above
    /// `threshold` qualifies; on ties the first one seen wins.
    pub fn find_semantic_match(
        &self,
        path: &str,
        query: &str,
        threshold: f64,
    ) -> Option<(FileInfo, f64)> {
        let query_terms = tokenize(query);
        let state = self.lock();

        let mut best: Option<(&FileInfo, f64)> = None;
        for (_, entry) in state.cache.matching(path) {
            for info in &entry.files {
                let score = similarity(&query_terms, &tokenize(&info.name_without_ext));
                let best_score = best.map(|(_, s)| s).unwrap_or(0.0);
                if score > best_score && score > threshold {
                    best = Some((info, score));
                }
            }
        }
        best.map(|(info, score)| (info.clone(), score))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
