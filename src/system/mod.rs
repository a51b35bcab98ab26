//! Running programs and host facts.
//!
//! Handlers never touch the process table directly; they go through [`ProcessTable`],
//! so tests can swap in [`StaticProcessTable`] and never signal a real process.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use sysinfo::{Disks, Pid, ProcessesToUpdate, Signal, System};
use tracing::debug;

/// One running process as the handlers see it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    /// Resident memory in bytes
    pub memory_bytes: u64,
}

impl ProcessEntry {
    pub fn new(pid: u32, name: impl Into<String>, memory_bytes: u64) -> Self {
        Self { pid, name: name.into(), memory_bytes }
    }
}

/// Space on the volume mounted at the filesystem root, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskSpace {
    pub total: u64,
    pub available: u64,
}

/// Raw host facts; the handler formats them for the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostFacts {
    pub os_name: String,
    pub os_version: String,
    pub architecture: String,
    pub processor: String,
    pub hostname: String,
    pub memory_total: u64,
    pub memory_available: u64,
    pub memory_used: u64,
    pub root_disk: Option<DiskSpace>,
    pub process_count: usize,
}

/// Trait for process table access (allows mocking in tests)
pub trait ProcessTable: Send + Sync {
    /// Every process visible to this user, ordered by pid
    fn processes(&self) -> Result<Vec<ProcessEntry>>;

    /// Ask a process to exit (SIGTERM where the platform has it)
    fn terminate(&self, pid: u32) -> Result<()>;

    fn host_facts(&self) -> Result<HostFacts>;
}

/// Process table backed by the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessTable;

impl SystemProcessTable {
    fn root_disk() -> Option<DiskSpace> {
        let disks = Disks::new_with_refreshed_list();
        let root = disks
            .list()
            .iter()
            .find(|d| d.mount_point() == Path::new("/"))
            .or_else(|| disks.list().first())?;
        Some(DiskSpace { total: root.total_space(), available: root.available_space() })
    }
}

impl ProcessTable for SystemProcessTable {
    fn processes(&self) -> Result<Vec<ProcessEntry>> {
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);

        let mut entries: Vec<ProcessEntry> = system
            .processes()
            .iter()
            .map(|(pid, process)| {
                ProcessEntry::new(pid.as_u32(), process.name().to_string_lossy(), process.memory())
            })
            .collect();
        entries.sort_by_key(|e| e.pid);
        debug!(count = entries.len(), "listed processes");
        Ok(entries)
    }

    fn terminate(&self, pid: u32) -> Result<()> {
        let target = Pid::from_u32(pid);
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::Some(&[target]), true);
        let process = system
            .process(target)
            .with_context(|| format!("Process {} is no longer running", pid))?;

        // Platforms without SIGTERM fall back to a hard kill
        let sent = process.kill_with(Signal::Term).unwrap_or_else(|| process.kill());
        if !sent {
            bail!("Could not signal process {}", pid);
        }
        debug!(pid, "terminated process");
        Ok(())
    }

    fn host_facts(&self) -> Result<HostFacts> {
        let mut system = System::new();
        system.refresh_memory();
        system.refresh_cpu_all();
        system.refresh_processes(ProcessesToUpdate::All, true);

        let processor = system.cpus().first().map(|cpu| cpu.brand().trim().to_string()).unwrap_or_default();
        Ok(HostFacts {
            os_name: System::name().unwrap_or_default(),
            os_version: System::os_version().unwrap_or_default(),
            architecture: std::env::consts::ARCH.to_string(),
            processor,
            hostname: System::host_name().unwrap_or_default(),
            memory_total: system.total_memory(),
            memory_available: system.available_memory(),
            memory_used: system.used_memory(),
            root_disk: Self::root_disk(),
            process_count: system.processes().len(),
        })
    }
}

/// Fixed process table that records terminations instead of signalling
#[derive(Debug, Default)]
pub struct StaticProcessTable {
    processes: Vec<ProcessEntry>,
    facts: HostFacts,
    terminated: Mutex<Vec<u32>>,
}

impl StaticProcessTable {
    pub fn new(processes: Vec<ProcessEntry>) -> Self {
        Self { processes, ..Self::default() }
    }

    pub fn with_facts(mut self, facts: HostFacts) -> Self {
        self.facts = facts;
        self
    }

    /// Pids passed to [`ProcessTable::terminate`], in call order
    pub fn terminated(&self) -> Vec<u32> {
        self.terminated.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

impl ProcessTable for StaticProcessTable {
    fn processes(&self) -> Result<Vec<ProcessEntry>> {
        Ok(self.processes.clone())
    }

    fn terminate(&self, pid: u32) -> Result<()> {
        if !self.processes.iter().any(|p| p.pid == pid) {
            bail!("Process {} is no longer running", pid);
        }
        if let Ok(mut terminated) = self.terminated.lock() {
            terminated.push(pid);
        }
        Ok(())
    }

    fn host_facts(&self) -> Result<HostFacts> {
        Ok(HostFacts { process_count: self.processes.len(), ..self.facts.clone() })
    }
}
