//! Desktop launcher: the one place the engine spawns other programs.
//!
//! Handlers never call `std::process` directly; they go through [`Launcher`], so
//! tests (and `search --no-open`) can swap in [`RecordingLauncher`].

mod apps;

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use tracing::debug;

pub use apps::resolve_application;

/// Interpreter family chosen from a script's extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    Python,
    Batch,
    PowerShell,
    Node,
    Shell,
    Executable,
    Html,
}

impl ScriptKind {
    /// Map a lowercase extension (with or without the dot) to a script kind
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "py" => Some(ScriptKind::Python),
            "bat" | "cmd" => Some(ScriptKind::Batch),
            "ps1" => Some(ScriptKind::PowerShell),
            "js" => Some(ScriptKind::Node),
            "sh" => Some(ScriptKind::Shell),
            "exe" => Some(ScriptKind::Executable),
            "html" | "htm" => Some(ScriptKind::Html),
            _ => None,
        }
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScriptKind::Python => "python",
            ScriptKind::Batch => "batch",
            ScriptKind::PowerShell => "powershell",
            ScriptKind::Node => "node",
            ScriptKind::Shell => "shell",
            ScriptKind::Executable => "executable",
            ScriptKind::Html => "html",
        };
        f.write_str(name)
    }
}

/// Trait for desktop launch operations (allows mocking in tests)
pub trait Launcher: Send + Sync {
    /// Open a file or folder with its default handler, or with `application`
    fn open_path(&self, path: &Path, application: Option<&str>) -> Result<()>;

    /// Start an application by friendly name or executable
    fn open_application(&self, name: &str) -> Result<()>;

    fn open_url(&self, url: &str) -> Result<()>;

    /// Run a script in its interpreter without waiting for it to finish
    fn run_script(&self, kind: ScriptKind, path: &Path) -> Result<()>;
}

/// Real launcher spawning the platform opener
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl SystemLauncher {
    fn spawn(program: &str, args: &[&str]) -> Result<()> {
        debug!(program, ?args, "spawning");
        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to launch '{}'", program))?;
        Ok(())
    }

    /// Hand a path or URL to the desktop's default opener
    fn open_default(target: &str) -> Result<()> {
        if cfg!(target_os = "windows") {
            Self::spawn("cmd", &["/C", "start", "", target])
        } else if cfg!(target_os = "macos") {
            Self::spawn("open", &[target])
        } else {
            Self::spawn("xdg-open", &[target])
        }
    }
}

impl Launcher for SystemLauncher {
    fn open_path(&self, path: &Path, application: Option<&str>) -> Result<()> {
        let target = path.to_string_lossy().into_owned();
        let target = target.as_str();
        match application {
            None => Self::open_default(target),
            Some(app) => {
                let program = resolve_application(app);
                if cfg!(target_os = "macos") {
                    Self::spawn("open", &["-a", program.as_str(), target])
                } else {
                    Self::spawn(&program, &[target])
                }
            }
        }
    }

    fn open_application(&self, name: &str) -> Result<()> {
        let resolved = resolve_application(name);
        if resolved.is_empty() {
            bail!("No application name given");
        }
        // URI-style targets (ms-settings:, etc.) go through the opener
        if resolved.ends_with(':') {
            return Self::open_default(&resolved);
        }
        if cfg!(target_os = "macos") {
            return Self::spawn("open", &["-a", resolved.as_str()]);
        }
        let mut parts = resolved.split_whitespace();
        let program = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();
        Self::spawn(program, &args)
    }

    fn open_url(&self, url: &str) -> Result<()> {
        Self::open_default(url)
    }

    fn run_script(&self, kind: ScriptKind, path: &Path) -> Result<()> {
        let target = path.to_string_lossy().into_owned();
        let target = target.as_str();
        let windows = cfg!(target_os = "windows");
        match kind {
            ScriptKind::Python if windows => Self::spawn("cmd", &["/C", "start", "cmd", "/K", "python", target]),
            ScriptKind::Python => Self::spawn("python3", &[target]),
            ScriptKind::Batch if windows => Self::spawn("cmd", &["/C", "start", "cmd", "/K", target]),
            ScriptKind::Batch => bail!("Batch scripts only run on Windows"),
            ScriptKind::PowerShell if windows => {
                Self::spawn("cmd", &["/C", "start", "powershell", "-NoExit", "-File", target])
            }
            ScriptKind::PowerShell => Self::spawn("pwsh", &["-File", target]),
            ScriptKind::Node if windows => Self::spawn("cmd", &["/C", "start", "cmd", "/K", "node", target]),
            ScriptKind::Node => Self::spawn("node", &[target]),
            ScriptKind::Shell if windows => Self::spawn("cmd", &["/C", "start", "cmd", "/K", "wsl", "bash", target]),
            ScriptKind::Shell => Self::spawn("bash", &[target]),
            ScriptKind::Executable => Self::spawn(target, &[]),
            ScriptKind::Html => Self::open_default(target),
        }
    }
}

/// One call observed by [`RecordingLauncher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchRecord {
    OpenPath { path: PathBuf, application: Option<String> },
    OpenApplication(String),
    OpenUrl(String),
    RunScript { kind: ScriptKind, path: PathBuf },
}

/// Launcher that records calls instead of spawning anything
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    calls: Mutex<Vec<LaunchRecord>>,
    should_fail: bool,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records calls but reports every one of them as failed
    pub fn with_failure() -> Self {
        Self { calls: Mutex::new(Vec::new()), should_fail: true }
    }

    pub fn calls(&self) -> Vec<LaunchRecord> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: LaunchRecord) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.should_fail {
            bail!("Launcher unavailable");
        }
        Ok(())
    }
}

impl Launcher for RecordingLauncher {
    fn open_path(&self, path: &Path, application: Option<&str>) -> Result<()> {
        self.record(LaunchRecord::OpenPath {
            path: path.to_path_buf(),
            application: application.map(str::to_string),
        })
    }

    fn open_application(&self, name: &str) -> Result<()> {
        self.record(LaunchRecord::OpenApplication(name.to_string()))
    }

    fn open_url(&self, url: &str) -> Result<()> {
        self.record(LaunchRecord::OpenUrl(url.to_string()))
    }

    fn run_script(&self, kind: ScriptKind, path: &Path) -> Result<()> {
        self.record(LaunchRecord::RunScript { kind, path: path.to_path_buf() })
    }
}
