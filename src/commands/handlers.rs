//! Filesystem and desktop handlers.
//!
//! Each handler takes already-resolved absolute paths and returns a
//! [`CommandResult`]. Nothing here panics or propagates: I/O failures become
//! `CommandError`s, with `NotFound`/`AlreadyExists` promoted where the caller can act
//! on them.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use similar::TextDiff;
use walkdir::WalkDir;

use crate::error::CommandError;
use crate::launcher::{Launcher, ScriptKind};
use crate::models::system::{gigabytes, megabytes, percentage};
use crate::models::{CommandResult, DiskUsage, HostInfo, MemoryUsage, Outcome, ProgramUsage, SystemReport};
use crate::system::{ProcessEntry, ProcessTable};
use crate::utils::{display_path, validate_file_size};

const WEB_SEARCH_URL: &str = "https://www.google.com/search?q=";
const BROWSE_CLARIFY: &str =
    "What would you like me to search for or which website would you like to visit?";
const CLOSE_CLARIFY: &str = "Which program would you like me to close? Please specify the program name.";
/// Name closeness above which an unmatched program is offered as a suggestion
const SUGGESTION_RATIO: f32 = 0.6;
const MAX_SUGGESTIONS: usize = 3;

pub fn list_directory(path: &Path) -> CommandResult {
    let entries = fs::read_dir(path).map_err(|e| {
        CommandError::from_io(&e, format!("Directory not found at '{}'", path.display()))
    })?;

    let mut contents: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    contents.sort();

    Ok(Outcome::Listing { directory: display_path(path), contents })
}

pub fn create_directory(path: &Path, exist_ok: bool) -> CommandResult {
    if !exist_ok && path.exists() {
        return Err(CommandError::already_exists(format!(
            "Directory already exists at '{}'",
            path.display()
        )));
    }
    fs::create_dir_all(path).map_err(|e| {
        CommandError::from_io(&e, format!("Failed to create directory '{}': {}", path.display(), e))
    })?;
    Ok(Outcome::message(format!("Directory created at '{}'", path.display())))
}

fn write_contents(path: &Path, content: &str) -> Result<(), CommandError> {
    fs::write(path, content).map_err(|e| {
        CommandError::from_io(&e, format!("Failed to write '{}': {}", path.display(), e))
    })
}

pub fn create_file(path: &Path, content: &str, open_after: bool, launcher: &dyn Launcher) -> CommandResult {
    write_contents(path, content)?;
    if open_after {
        launcher.open_path(path, None)?;
    }
    Ok(Outcome::message(format!("Created file '{}'", path.display())))
}

pub fn write_file(path: &Path, content: &str, open_after: bool, launcher: &dyn Launcher) -> CommandResult {
    write_contents(path, content)?;
    if open_after {
        launcher.open_path(path, None)?;
    }
    Ok(Outcome::message(format!("Wrote to '{}'", path.display())))
}

pub fn read_file(path: &Path) -> CommandResult {
    let not_found = || CommandError::not_found(format!("File not found at '{}'", path.display()));
    let mut file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => not_found(),
        _ => CommandError::from_io(&e, format!("Failed to open '{}': {}", path.display(), e)),
    })?;
    validate_file_size(&file, path)?;

    let mut content = String::new();
    file.read_to_string(&mut content).map_err(|e| {
        CommandError::io(format!("Failed to read '{}' as text: {}", path.display(), e))
    })?;
    Ok(Outcome::FileContent { path: display_path(path), content })
}

pub fn open_file(path: &Path, application: Option<&str>, launcher: &dyn Launcher) -> CommandResult {
    if !path.exists() {
        return Err(CommandError::not_found(format!("File not found at '{}'", path.display())));
    }
    let application = application.map(str::trim).filter(|a| !a.is_empty());
    launcher.open_path(path, application)?;
    Ok(Outcome::message(format!("Opened file '{}'", path.display())))
}

pub fn open_folder(path: &Path, launcher: &dyn Launcher) -> CommandResult {
    if !path.is_dir() {
        return Err(CommandError::not_found(format!("Folder not found: '{}'", path.display())));
    }
    launcher.open_path(path, None)?;
    Ok(Outcome::message(format!("Opened folder '{}'", path.display())))
}

/// Copy a directory tree; `destination` must not exist yet
fn copy_tree(source: &Path, destination: &Path) -> Result<()> {
    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.with_context(|| format!("Failed to walk '{}'", source.display()))?;
        let relative = entry.path().strip_prefix(source).context("Entry outside copy source")?;
        let target = destination.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create '{}'", target.display()))?;
        } else {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("Failed to copy '{}'", entry.path().display()))?;
        }
    }
    Ok(())
}

/// Where an item lands: inside `destination` when that is an existing directory
fn landing_path(source: &Path, destination: &Path) -> PathBuf {
    match source.file_name() {
        Some(name) if destination.is_dir() => destination.join(name),
        _ => destination.to_path_buf(),
    }
}

pub fn copy_item(source: &Path, destination: &Path) -> CommandResult {
    if !source.exists() {
        return Err(CommandError::not_found(format!("Source '{}' not found.", source.display())));
    }

    if source.is_dir() {
        if destination.exists() {
            return Err(CommandError::already_exists(format!(
                "Destination '{}' already exists.",
                destination.display()
            )));
        }
        copy_tree(source, destination)?;
    } else {
        let target = landing_path(source, destination);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CommandError::from_io(&e, format!("Failed to create '{}': {}", parent.display(), e))
            })?;
        }
        fs::copy(source, &target).map_err(|e| {
            CommandError::from_io(&e, format!("Failed to copy '{}': {}", source.display(), e))
        })?;
    }

    Ok(Outcome::message(format!(
        "Successfully copied '{}' to '{}'",
        source.display(),
        destination.display()
    )))
}

pub fn move_item(source: &Path, destination: &Path) -> CommandResult {
    if !source.exists() {
        return Err(CommandError::not_found(format!("Source '{}' not found.", source.display())));
    }
    let target = landing_path(source, destination);
    if target != destination && target.exists() {
        return Err(CommandError::already_exists(format!(
            "Destination path '{}' already exists",
            target.display()
        )));
    }

    match fs::rename(source, &target) {
        Ok(()) => {}
        // Rename can't cross filesystems; copy into the still-absent target, then remove
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            if source.is_dir() {
                copy_tree(source, &target)?;
                fs::remove_dir_all(source)
                    .with_context(|| format!("Failed to remove '{}' after copy", source.display()))?;
            } else {
                fs::copy(source, &target)
                    .with_context(|| format!("Failed to move '{}'", source.display()))?;
                fs::remove_file(source)
                    .with_context(|| format!("Failed to remove '{}' after copy", source.display()))?;
            }
        }
        Err(e) => {
            return Err(CommandError::from_io(
                &e,
                format!("Failed to move '{}' to '{}': {}", source.display(), target.display(), e),
            ));
        }
    }

    Ok(Outcome::message(format!(
        "Successfully moved '{}' to '{}'",
        source.display(),
        destination.display()
    )))
}

pub fn delete_file(path: &Path) -> CommandResult {
    fs::remove_file(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            CommandError::not_found(format!("File not found at '{}'", path.display()))
        }
        _ => CommandError::from_io(&e, format!("Failed to delete '{}': {}", path.display(), e)),
    })?;
    Ok(Outcome::message(format!("Successfully deleted file: '{}'", path.display())))
}

pub fn delete_directory(path: &Path) -> CommandResult {
    fs::remove_dir_all(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            CommandError::not_found(format!("Directory not found at '{}'", path.display()))
        }
        _ => CommandError::from_io(&e, format!("Failed to delete '{}': {}", path.display(), e)),
    })?;
    Ok(Outcome::message(format!(
        "Successfully deleted directory and its contents: '{}'",
        path.display()
    )))
}

pub fn execute_code(path: &Path, launcher: &dyn Launcher) -> CommandResult {
    if !path.exists() {
        return Err(CommandError::not_found(format!("File not found at '{}'", path.display())));
    }
    let ext = path.extension().map(|e| e.to_string_lossy().to_lowercase()).unwrap_or_default();
    let Some(kind) = ScriptKind::from_extension(&ext) else {
        let shown = if ext.is_empty() { String::new() } else { format!(".{}", ext) };
        return Err(CommandError::unsupported(format!("Unsupported file type: {}", shown)));
    };

    launcher.run_script(kind, path)?;
    Ok(Outcome::message(format!("Executed '{}' as {}", path.display(), kind)))
}

pub fn open_application(application: &str, launcher: &dyn Launcher) -> CommandResult {
    let application = application.trim();
    if application.is_empty() {
        return Ok(Outcome::Clarify { clarify: "Which application would you like me to open?".to_string() });
    }
    launcher.open_application(application)?;
    Ok(Outcome::message(format!("Opened {}", application)))
}

/// URL for a website name or a free-text web search; `None` when neither is given
pub fn browse_url(website: Option<&str>, query: Option<&str>) -> Option<String> {
    let website = website.map(str::trim).filter(|w| !w.is_empty());
    let query = query.map(str::trim).filter(|q| !q.is_empty());

    if let Some(site) = website {
        if site.starts_with("http://") || site.starts_with("https://") {
            return Some(site.to_string());
        }
        return Some(format!("https://{}", site));
    }
    query.map(|q| format!("{}{}", WEB_SEARCH_URL, utf8_percent_encode(q, NON_ALPHANUMERIC)))
}

pub fn browse_internet(website: Option<&str>, query: Option<&str>, launcher: &dyn Launcher) -> CommandResult {
    let Some(url) = browse_url(website, query) else {
        return Ok(Outcome::Clarify { clarify: BROWSE_CLARIFY.to_string() });
    };
    launcher.open_url(&url)?;
    Ok(Outcome::Browse { message: format!("Opened {}", url), url })
}

pub fn get_current_time() -> CommandResult {
    let now = Local::now();
    Ok(Outcome::Time {
        time: now.format("%H:%M:%S").to_string(),
        date: now.format("%Y-%m-%d").to_string(),
        day: now.format("%A").to_string(),
        timezone: now.format("%:z").to_string(),
    })
}

/// Case-insensitive containment, or an exact match once a trailing `.exe` is dropped
fn program_matches(wanted: &str, process_name: &str) -> bool {
    let name = process_name.to_lowercase();
    name.contains(wanted) || name.trim_end_matches(".exe") == wanted
}

/// Names in first-seen order, duplicates dropped
fn distinct_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for name in names {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}

pub fn close_program(program_name: Option<&str>, processes: &dyn ProcessTable) -> CommandResult {
    let Some(program_name) = program_name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(Outcome::Clarify { clarify: CLOSE_CLARIFY.to_string() });
    };
    let wanted = program_name.to_lowercase();
    let running = processes.processes().context("Failed to close program")?;
    let matching: Vec<&ProcessEntry> = running.iter().filter(|p| program_matches(&wanted, &p.name)).collect();

    match matching.as_slice() {
        [] => {
            let close = running.iter().filter(|p| {
                TextDiff::from_chars(wanted.as_str(), p.name.to_lowercase().as_str()).ratio() > SUGGESTION_RATIO
            });
            let mut suggestions = distinct_names(close.map(|p| p.name.as_str()));
            suggestions.truncate(MAX_SUGGESTIONS);
            if suggestions.is_empty() {
                return Err(CommandError::not_found(format!(
                    "No running program found matching '{}'",
                    program_name
                )));
            }
            Ok(Outcome::Clarify {
                clarify: format!("I couldn't find '{}'. Did you mean: {}?", program_name, suggestions.join(", ")),
            })
        }
        [target] => {
            processes
                .terminate(target.pid)
                .with_context(|| format!("Failed to close program {}", target.name))?;
            Ok(Outcome::message(format!("Successfully closed {}", target.name)))
        }
        several => {
            let names = distinct_names(several.iter().map(|p| p.name.as_str()));
            Ok(Outcome::Clarify {
                clarify: format!(
                    "Multiple programs found: {}. Which one would you like to close?",
                    names.join(", ")
                ),
            })
        }
    }
}

pub fn list_running_programs(processes: &dyn ProcessTable) -> CommandResult {
    let running = processes.processes().context("Failed to list running programs")?;

    let mut grouped: BTreeMap<String, (Vec<u32>, u64)> = BTreeMap::new();
    for process in running {
        let (pids, memory) = grouped.entry(process.name).or_default();
        pids.push(process.pid);
        *memory += process.memory_bytes;
    }

    let running_programs = grouped
        .into_iter()
        .map(|(name, (pids, memory))| {
            let usage = ProgramUsage { count: pids.len(), pids, memory_usage: megabytes(memory) };
            (name, usage)
        })
        .collect();
    Ok(Outcome::Programs { running_programs })
}

pub fn get_system_info(processes: &dyn ProcessTable) -> CommandResult {
    let facts = processes.host_facts().context("Failed to get system info")?;

    let memory_info = MemoryUsage {
        total: gigabytes(facts.memory_total),
        available: gigabytes(facts.memory_available),
        used: gigabytes(facts.memory_used),
        percentage: percentage(facts.memory_total.saturating_sub(facts.memory_available), facts.memory_total),
    };
    let disk_info = facts.root_disk.map(|disk| {
        let used = disk.total.saturating_sub(disk.available);
        DiskUsage {
            total: gigabytes(disk.total),
            used: gigabytes(used),
            free: gigabytes(disk.available),
            percentage: percentage(used, disk.total),
        }
    });

    Ok(Outcome::System(SystemReport {
        system_info: HostInfo {
            system: facts.os_name,
            version: facts.os_version,
            architecture: facts.architecture,
            processor: facts.processor,
            hostname: facts.hostname,
        },
        memory_info,
        disk_info,
        running_processes: facts.process_count,
        current_time: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::error::ErrorKind;
    use crate::launcher::{LaunchRecord, RecordingLauncher};
    use crate::models::result_to_value;
    use crate::system::{DiskSpace, HostFacts, StaticProcessTable};

    fn clarify(result: CommandResult) -> String {
        match result {
            Ok(Outcome::Clarify { clarify }) => clarify,
            other => panic!("expected clarify, got {:?}", other),
        }
    }

    fn desktop() -> StaticProcessTable {
        StaticProcessTable::new(vec![
            ProcessEntry::new(10, "notepad.exe", 4 * 1024 * 1024),
            ProcessEntry::new(20, "chrome", 100 * 1024 * 1024),
            ProcessEntry::new(21, "chrome", 50 * 1024 * 1024),
            ProcessEntry::new(30, "Spotify", 0),
        ])
    }

    fn message(result: CommandResult) -> String {
        match result {
            Ok(Outcome::Message { message }) => message,
            other => panic!("expected message, got {:?}", other),
        }
    }

    #[test]
    fn test_list_directory_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();

        match list_directory(dir.path()).unwrap() {
            Outcome::Listing { directory, contents } => {
                assert_eq!(directory, display_path(dir.path()));
                assert_eq!(contents, vec!["a".to_string(), "b.txt".to_string()]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_list_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = list_directory(&dir.path().join("missing")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.message.starts_with("Directory not found at"));
    }

    #[test]
    fn test_create_directory_exist_ok() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("x").join("y");
        assert!(create_directory(&target, true).is_ok());
        assert!(target.is_dir());
        assert!(create_directory(&target, true).is_ok());
        assert_eq!(create_directory(&target, false).unwrap_err().kind, ErrorKind::AlreadyExists);
    }

    #[test]
    fn test_create_write_and_read_file() {
        let dir = TempDir::new().unwrap();
        let launcher = RecordingLauncher::new();
        let path = dir.path().join("notes.txt");

        assert!(message(create_file(&path, "first", false, &launcher)).starts_with("Created file"));
        assert!(message(write_file(&path, "second", true, &launcher)).starts_with("Wrote to"));
        assert_eq!(launcher.calls(), vec![LaunchRecord::OpenPath { path: path.clone(), application: None }]);

        match read_file(&path).unwrap() {
            Outcome::FileContent { content, .. } => assert_eq!(content, "second"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_create_file_in_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope").join("a.txt");
        let err = create_file(&path, "", false, &RecordingLauncher::new()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_file(&dir.path().join("ghost.txt")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.message.contains("ghost.txt"));
    }

    #[test]
    fn test_open_file_and_folder() {
        let dir = TempDir::new().unwrap();
        let launcher = RecordingLauncher::new();
        let file = dir.path().join("a.txt");
        fs::write(&file, b"").unwrap();

        assert!(open_file(&file, Some(" notepad "), &launcher).is_ok());
        assert!(open_folder(dir.path(), &launcher).is_ok());
        assert_eq!(
            launcher.calls(),
            vec![
                LaunchRecord::OpenPath { path: file.clone(), application: Some("notepad".into()) },
                LaunchRecord::OpenPath { path: dir.path().to_path_buf(), application: None },
            ]
        );

        assert_eq!(open_folder(&file, &launcher).unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(
            open_file(&dir.path().join("[SEARCH_RESULT_PATH]"), None, &launcher).unwrap_err().kind,
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_launcher_failure_becomes_io_error() {
        let dir = TempDir::new().unwrap();
        let err = open_folder(dir.path(), &RecordingLauncher::with_failure()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Io);
        assert!(err.message.contains("Launcher unavailable"));
    }

    #[test]
    fn test_copy_file_into_new_parent() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.txt");
        fs::write(&source, b"data").unwrap();
        let destination = dir.path().join("backup").join("a_copy.txt");

        assert!(copy_item(&source, &destination).is_ok());
        assert_eq!(fs::read(&destination).unwrap(), b"data");
        assert!(source.exists());
    }

    #[test]
    fn test_copy_file_into_existing_directory() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.txt");
        fs::write(&source, b"data").unwrap();
        let target_dir = dir.path().join("docs");
        fs::create_dir(&target_dir).unwrap();

        assert!(copy_item(&source, &target_dir).is_ok());
        assert!(target_dir.join("a.txt").is_file());
    }

    #[test]
    fn test_copy_directory_refuses_existing_destination() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        fs::create_dir_all(source.join("nested")).unwrap();
        fs::write(source.join("nested").join("f.txt"), b"x").unwrap();

        let destination = dir.path().join("dst");
        assert!(copy_item(&source, &destination).is_ok());
        assert!(destination.join("nested").join("f.txt").is_file());

        let err = copy_item(&source, &destination).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyExists);
    }

    #[test]
    fn test_copy_missing_source() {
        let dir = TempDir::new().unwrap();
        let err = copy_item(&dir.path().join("none"), &dir.path().join("b")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_move_file_and_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, b"x").unwrap();
        let target_dir = dir.path().join("archive");
        fs::create_dir(&target_dir).unwrap();

        assert!(message(move_item(&file, &target_dir)).starts_with("Successfully moved"));
        assert!(!file.exists());
        assert!(target_dir.join("a.txt").is_file());

        let renamed = dir.path().join("old_archive");
        assert!(move_item(&target_dir, &renamed).is_ok());
        assert!(renamed.join("a.txt").is_file());

        assert_eq!(move_item(&file, &renamed).unwrap_err().kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_move_directory_refuses_occupied_landing_path() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("x.txt"), b"new").unwrap();
        let landing = dir.path().join("dest").join("a");
        fs::create_dir_all(&landing).unwrap();
        fs::write(landing.join("x.txt"), b"old").unwrap();
        fs::write(landing.join("keep.txt"), b"keep").unwrap();

        let err = move_item(&source, &dir.path().join("dest")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyExists);
        assert!(err.message.contains("already exists"));
        assert_eq!(fs::read(landing.join("x.txt")).unwrap(), b"old");
        assert!(landing.join("keep.txt").is_file());
        assert!(source.join("x.txt").is_file());
    }

    #[test]
    fn test_move_file_refuses_same_name_in_target_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("report.txt");
        fs::write(&file, b"new").unwrap();
        let archive = dir.path().join("archive");
        fs::create_dir(&archive).unwrap();
        fs::write(archive.join("report.txt"), b"old").unwrap();

        assert_eq!(move_item(&file, &archive).unwrap_err().kind, ErrorKind::AlreadyExists);
        assert_eq!(fs::read(archive.join("report.txt")).unwrap(), b"old");
        assert!(file.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_move_rename_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("tree");
        fs::create_dir_all(source.join("inner")).unwrap();

        // A directory can't be moved inside itself
        let err = move_item(&source, &source.join("inner").join("deeper")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Io);
        assert!(err.message.starts_with("Failed to move"));
        assert!(source.join("inner").is_dir());
    }

    #[test]
    fn test_delete_file_and_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, b"x").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(sub.join("deep")).unwrap();

        assert!(delete_file(&file).is_ok());
        assert_eq!(delete_file(&file).unwrap_err().kind, ErrorKind::NotFound);
        assert!(delete_directory(&sub).is_ok());
        assert!(!sub.exists());
        assert_eq!(delete_directory(&sub).unwrap_err().kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_execute_code_by_extension() {
        let dir = TempDir::new().unwrap();
        let launcher = RecordingLauncher::new();
        let script = dir.path().join("run.PY");
        fs::write(&script, b"print(1)").unwrap();
        let doc = dir.path().join("letter.docx");
        fs::write(&doc, b"").unwrap();

        assert!(execute_code(&script, &launcher).is_ok());
        assert_eq!(
            launcher.calls(),
            vec![LaunchRecord::RunScript { kind: ScriptKind::Python, path: script.clone() }]
        );

        let err = execute_code(&doc, &launcher).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unsupported);
        assert_eq!(err.message, "Unsupported file type: .docx");

        let missing = execute_code(&dir.path().join("x.py"), &launcher).unwrap_err();
        assert_eq!(missing.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_browse_url() {
        assert_eq!(browse_url(Some("example.com"), None).as_deref(), Some("https://example.com"));
        assert_eq!(browse_url(Some("http://x.org"), Some("ignored")).as_deref(), Some("http://x.org"));
        assert_eq!(
            browse_url(None, Some("rust file walk")).as_deref(),
            Some("https://www.google.com/search?q=rust%20file%20walk")
        );
        assert_eq!(browse_url(Some("  "), None), None);
    }

    #[test]
    fn test_browse_without_target_asks() {
        let launcher = RecordingLauncher::new();
        match browse_internet(None, None, &launcher).unwrap() {
            Outcome::Clarify { clarify } => assert_eq!(clarify, BROWSE_CLARIFY),
            other => panic!("unexpected {:?}", other),
        }
        assert!(launcher.calls().is_empty());
    }

    #[test]
    fn test_open_application() {
        let launcher = RecordingLauncher::new();
        assert_eq!(message(open_application("calculator", &launcher)), "Opened calculator");
        assert_eq!(launcher.calls(), vec![LaunchRecord::OpenApplication("calculator".into())]);
    }

    #[test]
    fn test_current_time_shape() {
        match get_current_time().unwrap() {
            Outcome::Time { time, date, day, timezone } => {
                assert_eq!(time.len(), 8);
                assert_eq!(date.len(), 10);
                assert!(!day.is_empty());
                assert!(timezone.starts_with('+') || timezone.starts_with('-'));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_close_program_single_match() {
        let table = desktop();
        assert_eq!(message(close_program(Some("Notepad"), &table)), "Successfully closed notepad.exe");
        assert_eq!(table.terminated(), vec![10]);
    }

    #[test]
    fn test_close_program_asks_when_ambiguous() {
        let table = desktop();
        assert_eq!(
            clarify(close_program(Some("chrome"), &table)),
            "Multiple programs found: chrome. Which one would you like to close?"
        );
        assert_eq!(clarify(close_program(None, &table)), CLOSE_CLARIFY);
        assert_eq!(clarify(close_program(Some("  "), &table)), CLOSE_CLARIFY);
        assert!(table.terminated().is_empty());
    }

    #[test]
    fn test_close_program_suggests_near_names() {
        let table = desktop();
        assert_eq!(
            clarify(close_program(Some("spotfy"), &table)),
            "I couldn't find 'spotfy'. Did you mean: Spotify?"
        );

        let err = close_program(Some("blender"), &table).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "No running program found matching 'blender'");
        assert!(table.terminated().is_empty());
    }

    #[test]
    fn test_list_running_programs_groups_by_name() {
        match list_running_programs(&desktop()).unwrap() {
            Outcome::Programs { running_programs } => {
                assert_eq!(running_programs.len(), 3);
                let chrome = &running_programs["chrome"];
                assert_eq!(chrome.count, 2);
                assert_eq!(chrome.pids, vec![20, 21]);
                assert_eq!(chrome.memory_usage, "150 MB");
                assert_eq!(running_programs["Spotify"].memory_usage, "0 MB");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_system_info_formats_facts() {
        let gib = 1024 * 1024 * 1024;
        let table = desktop().with_facts(HostFacts {
            os_name: "Linux".into(),
            hostname: "workstation".into(),
            memory_total: 16 * gib,
            memory_available: 4 * gib,
            memory_used: 12 * gib,
            root_disk: Some(DiskSpace { total: 100 * gib, available: 25 * gib }),
            ..HostFacts::default()
        });

        let value = result_to_value(&get_system_info(&table));
        assert_eq!(value["system_info"]["hostname"], "workstation");
        assert_eq!(value["memory_info"]["total"], "16 GB");
        assert_eq!(value["memory_info"]["percentage"], "75.0%");
        assert_eq!(value["disk_info"]["used"], "75 GB");
        assert_eq!(value["disk_info"]["free"], "25 GB");
        assert_eq!(value["running_processes"], 4);
        assert_eq!(value["current_time"].as_str().unwrap().len(), 19);
    }
}
