use std::collections::BTreeMap;

use serde::Serialize;

/// Processes sharing one program name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramUsage {
    pub count: usize,
    pub pids: Vec<u32>,
    /// Summed resident memory, e.g. `"112 MB"`
    pub memory_usage: String,
}

/// Running programs keyed by process name
pub type ProgramTable = BTreeMap<String, ProgramUsage>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostInfo {
    pub system: String,
    pub version: String,
    pub architecture: String,
    pub processor: String,
    pub hostname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryUsage {
    pub total: String,
    pub available: String,
    pub used: String,
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskUsage {
    pub total: String,
    pub used: String,
    pub free: String,
    pub percentage: String,
}

/// Payload of `get_system_info`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemReport {
    pub system_info: HostInfo,
    pub memory_info: MemoryUsage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_info: Option<DiskUsage>,
    pub running_processes: usize,
    pub current_time: String,
}

const GIB: u64 = 1024 * 1024 * 1024;
const MIB: u64 = 1024 * 1024;

/// Whole gigabytes, rounded down
pub fn gigabytes(bytes: u64) -> String {
    format!("{} GB", bytes / GIB)
}

/// Whole megabytes, rounded down
pub fn megabytes(bytes: u64) -> String {
    format!("{} MB", bytes / MIB)
}

/// Share of `total` taken by `used`, one decimal
pub fn percentage(used: u64, total: u64) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", used as f64 * 100.0 / total as f64)
}
