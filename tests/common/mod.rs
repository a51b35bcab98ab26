//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use filewise::{Agent, EngineConfig, RecordingLauncher, WorkflowExecutor};
use filewise::commands::CommandRegistry;
use filewise::memory::MemoryStore;
use tempfile::TempDir;

/// Builder for directory trees used as search roots and workflow sandboxes
pub struct TreeBuilder {
    temp_dir: TempDir,
}

impl TreeBuilder {
    /// Create a new builder with an empty root
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a file (parents created as needed)
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        let path = self.temp_dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&path, content).expect("Failed to write file");
        self
    }

    /// Add an empty directory (parents created as needed)
    pub fn with_dir(self, relative: &str) -> Self {
        fs::create_dir_all(self.temp_dir.path().join(relative)).expect("Failed to create dir");
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Config rooted at `dir` so omitted paths stay inside the sandbox
pub fn config_for(dir: &Path) -> EngineConfig {
    EngineConfig { default_dir: dir.to_path_buf(), ..EngineConfig::default() }
}

/// Executor wired to a recording launcher
pub fn executor_for(dir: &Path) -> (WorkflowExecutor, Arc<MemoryStore>, Arc<RecordingLauncher>) {
    let config = config_for(dir);
    let memory = Arc::new(MemoryStore::new(&config));
    let launcher = Arc::new(RecordingLauncher::new());
    let registry = CommandRegistry::new(config, memory.clone(), launcher.clone());
    (WorkflowExecutor::new(registry), memory, launcher)
}

pub fn agent_for(dir: &Path) -> (Agent, Arc<RecordingLauncher>) {
    let launcher = Arc::new(RecordingLauncher::new());
    (Agent::new(config_for(dir), launcher.clone()), launcher)
}

/// Absolute path string of `relative` under `root`
pub fn path_in(root: &Path, relative: &str) -> String {
    let path: PathBuf = root.join(relative);
    path.to_string_lossy().into_owned()
}

/// A small home-like tree with documents, photos and projects
pub fn realistic_tree() -> TempDir {
    TreeBuilder::new()
        .with_file("Documents/resume-2024.pdf", "")
        .with_file("Documents/cover_letter.docx", "")
        .with_file("Documents/taxes/2023_return.pdf", "")
        .with_file("Pictures/beach_photo.png", "")
        .with_file("Projects/site/index.html", "<html></html>")
        .with_file("Projects/site/deploy.sh", "echo deploy")
        .with_dir("Projects/empty")
        .build()
}
