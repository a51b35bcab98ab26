use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use crate::agent::Agent;
use crate::config::{
    DEFAULT_CONTEXT_WINDOW, DEFAULT_HISTORY_CAP, DEFAULT_SEMANTIC_THRESHOLD, DEFAULT_WALK_TIMEOUT_SECS,
    EngineConfig,
};
use crate::launcher::{Launcher, RecordingLauncher, SystemLauncher};
use crate::memory::MemoryStore;
use crate::models::{SearchType, result_to_value};
use crate::search::{SearchEngine, SearchRequest};
use crate::utils::resolve_path;

#[derive(Parser)]
#[command(name = "filewise")]
#[command(version = "0.1.0")]
#[command(about = "Run file-system intents and search files with a semantic fallback", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Engine settings shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Interactions kept in conversation history
    #[arg(long, global = true, env = "FILEWISE_HISTORY_CAP", default_value_t = DEFAULT_HISTORY_CAP)]
    pub history_cap: usize,

    /// Interactions rendered into the parser context
    #[arg(long, global = true, default_value_t = DEFAULT_CONTEXT_WINDOW)]
    pub context_window: usize,

    /// Minimum similarity for a semantic suggestion
    #[arg(long, global = true, env = "FILEWISE_SEMANTIC_THRESHOLD", default_value_t = DEFAULT_SEMANTIC_THRESHOLD)]
    pub semantic_threshold: f64,

    /// Use the semantic fallback when an intent does not say
    #[arg(long = "semantic-by-default", global = true, env = "FILEWISE_SEMANTIC")]
    pub semantic_by_default: bool,

    /// Seconds one filesystem walk may take
    #[arg(long, global = true, env = "FILEWISE_WALK_TIMEOUT_SECS", default_value_t = DEFAULT_WALK_TIMEOUT_SECS)]
    pub walk_timeout_secs: u64,

    /// Maximum cached searches (unbounded when omitted)
    #[arg(long, global = true, env = "FILEWISE_CACHE_CAPACITY")]
    pub cache_capacity: Option<usize>,

    /// Directory used when a command omits its path
    #[arg(long, global = true)]
    pub default_dir: Option<PathBuf>,
}

impl EngineArgs {
    pub fn to_config(&self) -> EngineConfig {
        let defaults = EngineConfig::default();
        EngineConfig {
            history_cap: self.history_cap,
            context_window: self.context_window,
            semantic_threshold: self.semantic_threshold,
            semantic_by_default: self.semantic_by_default,
            walk_timeout_secs: self.walk_timeout_secs,
            cache_capacity: self.cache_capacity,
            default_dir: self.default_dir.clone().unwrap_or(defaults.default_dir),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute one intent (argument, or stdin when omitted) and print the result
    Exec {
        /// Intent JSON: {"command": ..., "parameters": {...}} or {"workflow": [...]}
        intent: Option<String>,
    },
    /// Execute one intent per stdin line, keeping history and search cache between lines
    Shell,
    /// Search for files and folders by name
    ///
    /// Exact matches only: a one-shot process has no earlier searches to suggest from,
    /// so the semantic fallback is available in `shell` instead.
    Search {
        keyword: String,

        /// Directory to search (defaults to the default directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// file, folder or both
        #[arg(long = "type", default_value = "both")]
        search_type: String,

        /// Report a lone match instead of opening it
        #[arg(long)]
        no_open: bool,
    },
    /// Print the prompt that would be sent to the intent parser
    Prompt {
        text: String,

        /// Directory shown as the current directory
        #[arg(long)]
        cwd: Option<PathBuf>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.engine.to_config();

    match cli.command {
        Some(Commands::Exec { intent }) => {
            exec_intent(config, intent)?;
        }
        Some(Commands::Shell) => {
            run_shell(config)?;
        }
        Some(Commands::Search { keyword, path, search_type, no_open }) => {
            search(config, keyword, path, &search_type, no_open)?;
        }
        Some(Commands::Prompt { text, cwd }) => {
            show_prompt(config, &text, cwd)?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to render result")?);
    Ok(())
}

fn exec_intent(config: EngineConfig, intent: Option<String>) -> Result<()> {
    let text = match intent {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("Failed to read intent from stdin")?;
            buffer
        }
    };
    let intent: Value = serde_json::from_str(text.trim()).context("Intent is not valid JSON")?;

    let agent = Agent::new(config, Arc::new(SystemLauncher));
    let execution = agent.executor().execute(&intent);
    print_json(&execution.to_value())
}

fn run_shell(config: EngineConfig) -> Result<()> {
    let agent = Agent::new(config, Arc::new(SystemLauncher));
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let line = line.trim();
        match line {
            "" => continue,
            ":context" => writeln!(stdout, "{}", agent.memory().get_context())?,
            ":quit" | ":exit" => break,
            _ => {
                // Non-JSON lines are treated as a conversational reply
                let response = agent.handle_reply(line, line);
                writeln!(stdout, "{}", response["result"])?;
            }
        }
        stdout.flush()?;
    }

    Ok(())
}

fn search(
    config: EngineConfig,
    keyword: String,
    path: Option<PathBuf>,
    search_type: &str,
    no_open: bool,
) -> Result<()> {
    let search_type: SearchType = search_type.parse()?;
    let launcher: Arc<dyn Launcher> =
        if no_open { Arc::new(RecordingLauncher::new()) } else { Arc::new(SystemLauncher) };

    let memory = Arc::new(MemoryStore::new(&config));
    let engine = SearchEngine::new(memory, launcher, config.walk_timeout());
    let raw_root = path.map(|p| p.to_string_lossy().into_owned()).unwrap_or_default();
    let request = SearchRequest {
        keyword,
        root: resolve_path(&raw_root, &config.default_dir),
        search_type,
        use_semantic: false,
        threshold: config.semantic_threshold,
    };

    print_json(&result_to_value(&engine.search(&request)))
}

fn show_prompt(config: EngineConfig, text: &str, cwd: Option<PathBuf>) -> Result<()> {
    let current_dir = match cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    let agent = Agent::new(config, Arc::new(SystemLauncher));
    println!("{}", agent.build_prompt(text, &current_dir));
    Ok(())
}
