use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::CommandError;
use crate::models::SearchType;
use crate::utils::display_path;

/// Shared flag that stops a running walk
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

fn is_directory(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    // Symlinks are reported, not followed; classify them by their target
    file_type.is_dir() || (file_type.is_symlink() && entry.path().is_dir())
}

fn check_bounds(deadline: Instant, cancel: &CancelToken, root: &Path) -> Result<(), CommandError> {
    if cancel.is_cancelled() {
        return Err(CommandError::interrupted(format!(
            "Search cancelled while walking {}",
            root.display()
        )));
    }
    if Instant::now() >= deadline {
        return Err(CommandError::interrupted(format!(
            "Search timed out while walking {}",
            root.display()
        )));
    }
    Ok(())
}

/// Collect (files, folders) under `root` whose name contains `keyword`, case-insensitively
///
/// `root` itself is never reported. Entries are visited in file-name order. Entries
/// that cannot be read are skipped.
///
/// # Errors
///
/// Returns an `Interrupted` error if `deadline` passes or `cancel` is tripped mid-walk.
pub fn walk_matches(
    root: &Path,
    keyword: &str,
    search_type: SearchType,
    deadline: Instant,
    cancel: &CancelToken,
) -> Result<(Vec<String>, Vec<String>), CommandError> {
    let needle = keyword.to_lowercase();
    let mut files = Vec::new();
    let mut folders = Vec::new();
    let mut skipped = 0usize;

    check_bounds(deadline, cancel, root)?;

    for entry in WalkDir::new(root).min_depth(1).follow_links(false).sort_by_file_name() {
        check_bounds(deadline, cancel, root)?;

        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                skipped += 1;
                debug!("skipping unreadable entry: {}", e);
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().to_lowercase();
        if !name.contains(&needle) {
            continue;
        }

        if is_directory(&entry) {
            if search_type.includes_folders() {
                folders.push(display_path(entry.path()));
            }
        } else if search_type.includes_files() {
            files.push(display_path(entry.path()));
        }
    }

    if skipped > 0 {
        debug!(skipped, root = %root.display(), "walk skipped unreadable entries");
    }

    Ok((files, folders))
}
