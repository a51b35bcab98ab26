use std::borrow::Cow;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

// Maximum size read_file will load into a response: 10MB
pub const MAX_READ_BYTES: u64 = 10 * 1024 * 1024;

/// Resolve a path parameter the way every handler sees it
///
/// - empty input falls back to `default_dir`
/// - a leading `~` expands to the home directory
/// - relative paths are made absolute against the process working directory
///
/// Components are not normalized (no `..` folding, no symlink resolution), matching
/// what the user typed as closely as possible.
pub fn resolve_path(raw: &str, default_dir: &Path) -> PathBuf {
    let trimmed = raw.trim();
    let candidate = if trimmed.is_empty() {
        default_dir.to_path_buf()
    } else {
        expand_tilde(trimmed)
    };
    absolute(&candidate)
}

/// Expand `~` or `~/...` to the home directory; anything else is returned as-is
pub fn expand_tilde(raw: &str) -> PathBuf {
    expand_tilde_internal(raw, dirs::home_dir())
}

pub(crate) fn expand_tilde_internal(raw: &str, home: Option<PathBuf>) -> PathBuf {
    match (raw, home) {
        ("~", Some(home)) => home,
        (s, Some(home)) if s.starts_with("~/") || s.starts_with("~\\") => home.join(&s[2..]),
        (s, _) => PathBuf::from(s),
    }
}

/// Make `path` absolute without touching the filesystem
pub fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Lossy string form used in payloads and cache keys
pub fn display_path(path: &Path) -> String {
    match path.to_string_lossy() {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}

/// Validates that a file's size is within what `read_file` returns (10MB)
///
/// Takes an open file handle so the size check and the read see the same file.
///
/// # Errors
///
/// Returns an error if:
/// - The file metadata cannot be read
/// - The file is larger than 10MB
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let file_size = metadata.len();
    if file_size > MAX_READ_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_READ_BYTES
        );
    }

    Ok(())
}

/// Formats a path with ~ substitution for the home directory
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use filewise::utils::format_path_with_tilde;
///
/// let path = PathBuf::from("/Users/alice/Documents");
/// // Returns "~/Documents" if the home directory is /Users/alice
/// let formatted = format_path_with_tilde(&path);
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, dirs::home_dir().as_deref())
}

pub(crate) fn format_path_with_tilde_internal(path: &Path, home: Option<&Path>) -> String {
    if let Some(home) = home
        && let Ok(rest) = path.strip_prefix(home)
    {
        if rest.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~/{}", rest.display());
    }
    display_path(path)
}
