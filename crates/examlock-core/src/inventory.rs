//! Read-and-signal access to the OS process table.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;
use sysinfo::{Pid, ProcessStatus, Signal, System};

/// Coarse process state, folded down from the platform-specific status set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessState {
    Running,
    Sleeping,
    Zombie,
    Unknown,
}

impl From<ProcessStatus> for ProcessState {
    fn from(status: ProcessStatus) -> Self {
        match status {
            ProcessStatus::Run => ProcessState::Running,
            ProcessStatus::Sleep | ProcessStatus::Idle => ProcessState::Sleeping,
            ProcessStatus::Zombie => ProcessState::Zombie,
            _ => ProcessState::Unknown,
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProcessState::Running => "running",
            ProcessState::Sleeping => "sleeping",
            ProcessState::Zombie => "zombie",
            ProcessState::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Point-in-time snapshot of one OS process.
///
/// Recomputed on every inventory call; a pid identifies a process only
/// within that process's lifetime, so records are never cached across
/// calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub exe: Option<PathBuf>,
    /// Share of total physical memory, 0.0 to 1.0.
    pub memory_fraction: f32,
    /// Share of one CPU since the previous refresh, 0.0 to 1.0 per core.
    /// The first snapshot after construction reports zero.
    pub cpu_fraction: f32,
    pub status: ProcessState,
}

pub struct ProcessInventory {
    system: Mutex<System>,
}

impl ProcessInventory {
    /// # Errors
    ///
    /// Fails only when the OS exposes no process inspection at all; every
    /// later inventory call degrades per entry instead of failing whole.
    pub fn new() -> Result<Self> {
        anyhow::ensure!(
            sysinfo::IS_SUPPORTED_SYSTEM,
            "process inspection is not supported on this platform"
        );
        Ok(Self {
            system: Mutex::new(System::new_all()),
        })
    }

    /// Snapshot every visible process.
    ///
    /// Processes that exit or deny access mid-enumeration are skipped, not
    /// errors. Ordering is unspecified; callers sort as needed.
    pub fn list_processes(&self) -> Vec<ProcessRecord> {
        let mut system = self.system.lock().unwrap();
        system.refresh_processes();
        let total_memory = system.total_memory();

        system
            .processes()
            .iter()
            .filter_map(|(pid, process)| {
                let name = process.name();
                if name.is_empty() {
                    return None;
                }
                let memory_fraction = if total_memory == 0 {
                    0.0
                } else {
                    #[allow(clippy::cast_precision_loss)]
                    {
                        process.memory() as f32 / total_memory as f32
                    }
                };
                Some(ProcessRecord {
                    pid: pid.as_u32(),
                    name: name.to_string(),
                    exe: process.exe().map(std::path::Path::to_path_buf),
                    memory_fraction,
                    cpu_fraction: process.cpu_usage() / 100.0,
                    status: ProcessState::from(process.status()),
                })
            })
            .collect()
    }

    /// Send the cooperative terminate signal.
    ///
    /// `None` when the process is already gone, `Some(sent)` otherwise. A
    /// platform without a distinct terminate signal falls back to the
    /// unconditional kill.
    pub fn terminate_graceful(&self, pid: u32) -> Option<bool> {
        let mut system = self.system.lock().unwrap();
        let pid = Pid::from_u32(pid);
        if !system.refresh_process(pid) {
            return None;
        }
        let process = system.process(pid)?;
        Some(match process.kill_with(Signal::Term) {
            Some(sent) => sent,
            None => process.kill(),
        })
    }

    /// Unconditional kill. `None` when the process is already gone.
    pub fn kill_forced(&self, pid: u32) -> Option<bool> {
        let mut system = self.system.lock().unwrap();
        let pid = Pid::from_u32(pid);
        if !system.refresh_process(pid) {
            return None;
        }
        system.process(pid).map(|process| process.kill())
    }

    /// Whether the process has exited. An unreaped zombie counts as exited:
    /// it is dead, its parent just has not collected it yet.
    pub fn is_exited(&self, pid: u32) -> bool {
        let mut system = self.system.lock().unwrap();
        let pid = Pid::from_u32(pid);
        if !system.refresh_process(pid) {
            return true;
        }
        system
            .process(pid)
            .map_or(true, |process| {
                ProcessState::from(process.status()) == ProcessState::Zombie
            })
    }

    /// True when any Chromium-family browser was launched with remote
    /// debugging enabled.
    pub fn browser_debugging_enabled(&self) -> bool {
        let mut system = self.system.lock().unwrap();
        system.refresh_processes();
        system.processes().values().any(|process| {
            let name = process.name().to_lowercase();
            let is_browser =
                name.contains("chrome") || name.contains("chromium") || name.contains("edge");
            is_browser
                && process
                    .cmd()
                    .iter()
                    .any(|arg| arg.contains("--remote-debugging-port"))
        })
    }
}

#[cfg(test)]
mod tests;
