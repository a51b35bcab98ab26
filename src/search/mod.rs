//! Keyword search over a directory tree with a semantic fallback.
//!
//! # Flow
//!
//! 1. The root must exist, otherwise the search fails with `NotFound`.
//! 2. The subtree is walked once; every directory and file whose lowercased name
//!    contains the lowercased keyword is collected, filtered by [`SearchType`].
//! 3. With no exact hit and the semantic flag set, the [`MemoryStore`] is asked for the
//!    best previously seen file under the same root.
//! 4. The hits are cached under (root, keyword) whatever the outcome.
//! 5. **Auto-resolution**: a lone file or a lone folder (and nothing else) is opened
//!    right away. A lone semantic match is never opened; the report carries
//!    `suggested_path` instead so the caller decides.
//!
//! # Bounds
//!
//! The walk is the only operation that can block for long. It stops with an
//! `Interrupted` error once its deadline passes or its [`CancelToken`] is tripped.
//! Unreadable entries are skipped.

pub mod walk;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::CommandError;
use crate::launcher::Launcher;
use crate::memory::MemoryStore;
use crate::models::{CommandResult, Outcome, SearchHits, SearchReport, SearchType, SemanticMatch};
use crate::utils::{display_path, format_path_with_tilde};
pub use walk::{CancelToken, walk_matches};

/// Fully resolved search parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub keyword: String,
    pub root: PathBuf,
    pub search_type: SearchType,
    pub use_semantic: bool,
    pub threshold: f64,
}

/// What auto-resolution decided for a set of hits
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    OpenFile(String),
    OpenFolder(String),
    Suggest(SemanticMatch),
    Ambiguous,
}

impl Resolution {
    /// Exactly one hit across files, folders and semantic matches resolves; anything else doesn't
    pub fn decide(hits: &SearchHits) -> Self {
        match (hits.files.as_slice(), hits.folders.as_slice(), hits.semantic_matches.as_slice()) {
            ([file], [], []) => Resolution::OpenFile(file.clone()),
            ([], [folder], []) => Resolution::OpenFolder(folder.clone()),
            ([], [], [suggestion]) => Resolution::Suggest(suggestion.clone()),
            _ => Resolution::Ambiguous,
        }
    }
}

pub struct SearchEngine {
    memory: Arc<MemoryStore>,
    launcher: Arc<dyn Launcher>,
    walk_timeout: Duration,
    cancel: CancelToken,
}

impl SearchEngine {
    pub fn new(memory: Arc<MemoryStore>, launcher: Arc<dyn Launcher>, walk_timeout: Duration) -> Self {
        Self { memory, launcher, walk_timeout, cancel: CancelToken::new() }
    }

    /// Token that aborts the walk in progress, or the next one if none is running
    ///
    /// A cancel is consumed by the walk it stops; later searches run normally.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn search(&self, request: &SearchRequest) -> CommandResult {
        let root = &request.root;
        let root_display = display_path(root);

        if !root.exists() {
            return Err(CommandError::not_found(format!(
                "Search path does not exist: {}",
                root_display
            )));
        }

        let started = Instant::now();
        let deadline = started + self.walk_timeout;
        let walked = walk_matches(root, &request.keyword, request.search_type, deadline, &self.cancel);
        if self.cancel.is_cancelled() {
            self.cancel.reset();
        }
        let (files, folders) = walked?;

        let mut hits = SearchHits { files, folders, semantic_matches: Vec::new() };
        info!(
            keyword = %request.keyword,
            root = %format_path_with_tilde(root),
            files = hits.files.len(),
            folders = hits.folders.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search walk finished"
        );

        if request.use_semantic && hits.is_exact_empty() {
            if let Some((info, score)) =
                self.memory.find_semantic_match(&root_display, &request.keyword, request.threshold)
            {
                debug!(path = %info.path, score, "semantic fallback matched");
                hits.semantic_matches.push(SemanticMatch::new(&info, score));
            }
        }

        self.memory.cache_search_results(&root_display, &request.keyword, &hits);

        let mut report = SearchReport {
            total_found: hits.total(),
            results: hits,
            keyword: request.keyword.clone(),
            search_path: root_display,
            semantic_suggestion: None,
            suggested_path: None,
            opened: None,
        };

        match Resolution::decide(&report.results) {
            Resolution::OpenFile(path) | Resolution::OpenFolder(path) => {
                match self.launcher.open_path(&PathBuf::from(&path), None) {
                    Ok(()) => {
                        info!(path = %path, "auto-opened single search result");
                        report.opened = Some(path);
                    }
                    Err(e) => warn!(path = %path, "auto-open failed: {:#}", e),
                }
            }
            Resolution::Suggest(suggestion) => {
                report.semantic_suggestion = Some(format!(
                    "Found similar file: {} (similarity: {})",
                    suggestion.name, suggestion.similarity_score
                ));
                report.suggested_path = Some(suggestion.path);
            }
            Resolution::Ambiguous => {}
        }

        Ok(Outcome::Search(report))
    }
}
