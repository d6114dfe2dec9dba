use std::path::PathBuf;

/// Validated generator input. Built by a `ConfigSource`, consumed by the
/// script renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenConfig {
    pub workspace: PathBuf,
    /// Sampling frequency for `perf record -F`.
    pub record_frequency: u64,
    /// Event group for `perf record -e`, passed through verbatim.
    pub record_events: String,
    pub stat: StatBackend,
    pub annotate: bool,
    pub mode: RunMode,
}

/// Counter sampling tool used during the activity stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatBackend {
    /// `perf stat` interval mode, CSV output.
    PerfStat { interval_ms: u64, events: String },
    /// Intel EMON, installed under `mpp`.
    Emon { mpp: PathBuf },
}

impl StatBackend {
    pub fn label(&self) -> &'static str {
        match self {
            StatBackend::PerfStat { .. } => "perf-stat",
            StatBackend::Emon { .. } => "emon",
        }
    }
}

/// Who starts the workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// The script runs the workload itself. `command` already carries the
    /// taskset prefix when affinity was requested.
    ByPipa { command: String },
    /// The user starts the workload; the script samples system-wide for a
    /// fixed number of seconds per stage.
    ByUser {
        duration_record: u64,
        duration_stat: u64,
    },
}

impl RunMode {
    /// Command each stage wraps: the workload, or a `sleep` window.
    pub fn record_target(&self) -> String {
        match self {
            RunMode::ByPipa { command } => command.clone(),
            RunMode::ByUser {
                duration_record, ..
            } => format!("sleep {duration_record}"),
        }
    }

    pub fn stat_target(&self) -> String {
        match self {
            RunMode::ByPipa { command } => command.clone(),
            RunMode::ByUser { duration_stat, .. } => format!("sleep {duration_stat}"),
        }
    }
}
