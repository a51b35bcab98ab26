use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Interactions kept in history before FIFO eviction
pub const DEFAULT_HISTORY_CAP: usize = 10;
/// Interactions rendered into the parser context block
pub const DEFAULT_CONTEXT_WINDOW: usize = 3;
/// Minimum similarity a semantic match must exceed
pub const DEFAULT_SEMANTIC_THRESHOLD: f64 = 0.3;
/// Upper bound on a single filesystem walk
pub const DEFAULT_WALK_TIMEOUT_SECS: u64 = 30;

/// Engine-wide settings shared by the memory store, search engine and handlers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub history_cap: usize,
    pub context_window: usize,
    pub semantic_threshold: f64,
    pub semantic_by_default: bool,
    pub walk_timeout_secs: u64,
    /// `None` keeps every cached search for the life of the process
    pub cache_capacity: Option<usize>,
    pub default_dir: PathBuf,
}

impl EngineConfig {
    pub fn walk_timeout(&self) -> Duration {
        Duration::from_secs(self.walk_timeout_secs)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_cap: DEFAULT_HISTORY_CAP,
            context_window: DEFAULT_CONTEXT_WINDOW,
            semantic_threshold: DEFAULT_SEMANTIC_THRESHOLD,
            semantic_by_default: false,
            walk_timeout_secs: DEFAULT_WALK_TIMEOUT_SECS,
            cache_capacity: None,
            default_dir: PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.history_cap, 10);
        assert_eq!(config.context_window, 3);
        assert!((config.semantic_threshold - 0.3).abs() < f64::EPSILON);
        assert!(!config.semantic_by_default);
        assert_eq!(config.walk_timeout(), Duration::from_secs(30));
        assert_eq!(config.cache_capacity, None);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"history_cap": 4, "cache_capacity": 50}"#).unwrap();
        assert_eq!(config.history_cap, 4);
        assert_eq!(config.cache_capacity, Some(50));
        assert_eq!(config.context_window, DEFAULT_CONTEXT_WINDOW);
    }
}
