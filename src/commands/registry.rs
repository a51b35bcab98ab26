use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use super::{Command, DecodeError, SearchParams, handlers};
use crate::config::EngineConfig;
use crate::error::CommandError;
use crate::launcher::Launcher;
use crate::memory::MemoryStore;
use crate::models::{CommandResult, Outcome, RawCommand, SearchType};
use crate::search::{CancelToken, SearchEngine, SearchRequest};
use crate::system::{ProcessTable, SystemProcessTable};
use crate::utils::resolve_path;

/// Name-to-handler dispatch over typed [`Command`] variants
pub struct CommandRegistry {
    config: EngineConfig,
    launcher: Arc<dyn Launcher>,
    processes: Arc<dyn ProcessTable>,
    search: SearchEngine,
}

impl CommandRegistry {
    pub fn new(config: EngineConfig, memory: Arc<MemoryStore>, launcher: Arc<dyn Launcher>) -> Self {
        let search = SearchEngine::new(memory, launcher.clone(), config.walk_timeout());
        Self { config, launcher, processes: Arc::new(SystemProcessTable), search }
    }

    /// Swap the process table used by the program commands
    pub fn with_processes(mut self, processes: Arc<dyn ProcessTable>) -> Self {
        self.processes = processes;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Cancels the running search walk
    pub fn cancel_token(&self) -> CancelToken {
        self.search.cancel_token()
    }

    /// Decode and run one normalized command
    ///
    /// The inner result is the handler's fail-soft outcome. The outer `Err` is reserved
    /// for parameters no handler can accept, which the executor reports at top level.
    pub fn dispatch(&self, raw: &RawCommand) -> Result<CommandResult, CommandError> {
        debug!(command = raw.name(), params = %raw.params_display(), "dispatching command");
        match Command::from_raw(raw) {
            Ok(command) => Ok(self.execute(command)),
            Err(DecodeError::Rejected(err)) => Ok(Err(err)),
            Err(DecodeError::Dispatch(err)) => Err(err),
        }
    }

    fn resolve(&self, raw: Option<&str>) -> PathBuf {
        resolve_path(raw.unwrap_or(""), &self.config.default_dir)
    }

    fn search_request(&self, params: SearchParams) -> Result<SearchRequest, CommandError> {
        let root = params
            .search_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .or(params.path.as_deref());
        let search_type = match params.search_type.as_deref() {
            Some(raw) => raw.parse::<SearchType>()?,
            None => SearchType::Both,
        };

        Ok(SearchRequest {
            keyword: params.keyword,
            root: self.resolve(root),
            search_type,
            use_semantic: params.use_semantic.unwrap_or(self.config.semantic_by_default),
            threshold: params.semantic_threshold.unwrap_or(self.config.semantic_threshold),
        })
    }

    pub fn execute(&self, command: Command) -> CommandResult {
        let launcher = self.launcher.as_ref();
        match command {
            Command::ListDirectory(p) => handlers::list_directory(&self.resolve(p.path.as_deref())),
            Command::CreateDirectory(p) => {
                handlers::create_directory(&self.resolve(Some(&p.path)), p.exist_ok)
            }
            Command::CreateFile(p) => {
                handlers::create_file(&self.resolve(Some(&p.path)), &p.content, p.open_after, launcher)
            }
            Command::WriteFile(p) => {
                handlers::write_file(&self.resolve(Some(&p.path)), &p.content, p.open_after, launcher)
            }
            Command::ReadFile(p) => handlers::read_file(&self.resolve(Some(&p.path))),
            Command::OpenFile(p) => {
                handlers::open_file(&self.resolve(Some(&p.path)), p.application.as_deref(), launcher)
            }
            Command::OpenFolder(p) => handlers::open_folder(&self.resolve(Some(&p.path)), launcher),
            Command::MoveItem(p) => {
                handlers::move_item(&self.resolve(Some(&p.source)), &self.resolve(Some(&p.destination)))
            }
            Command::CopyItem(p) => {
                handlers::copy_item(&self.resolve(Some(&p.source)), &self.resolve(Some(&p.destination)))
            }
            Command::DeleteFile(p) => handlers::delete_file(&self.resolve(Some(&p.path))),
            Command::DeleteDirectory(p) => handlers::delete_directory(&self.resolve(Some(&p.path))),
            Command::SearchItem(p) => {
                let request = self.search_request(p)?;
                self.search.search(&request)
            }
            Command::ExecuteCode(p) => handlers::execute_code(&self.resolve(Some(&p.path)), launcher),
            Command::OpenApplication(p) => handlers::open_application(&p.application, launcher),
            Command::BrowseInternet(p) => {
                handlers::browse_internet(p.website.as_deref(), p.query.as_deref(), launcher)
            }
            Command::GetCurrentTime => handlers::get_current_time(),
            Command::CloseProgram(p) => handlers::close_program(p.program_name.as_deref(), self.processes.as_ref()),
            Command::ListRunningPrograms => handlers::list_running_programs(self.processes.as_ref()),
            Command::GetSystemInfo => handlers::get_system_info(self.processes.as_ref()),
            Command::Clarify(p) => Ok(Outcome::Clarify { clarify: p.question }),
            Command::Respond(p) => Ok(Outcome::Response { response: p.message }),
        }
    }
}
