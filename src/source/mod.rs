pub mod prompt;
pub mod yaml;

use std::{
    fs,
    io::{self, BufReader, Stdin, Stdout},
    path::{Path, PathBuf},
};

use crate::{
    error::{GenError, Result},
    model::{cli::ModeArg, config::GenConfig, cores::CoreSet},
};

pub const DEFAULT_WORKSPACE: &str = "./";
pub const DEFAULT_RECORD_FREQUENCY: u64 = 999;
pub const DEFAULT_RECORD_EVENTS: &str = "{cycles,instructions}:S";
pub const DEFAULT_STAT_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_STAT_EVENTS: &str =
    "cycles,instructions,branch-misses,L1-dcache-load-misses,L1-icache-load-misses";
pub const DEFAULT_MPP: &str = "/mnt/hdd/share/emon/system_health_monitor";
pub const DEFAULT_DURATION_SECS: u64 = 120;

/// Anything that can produce a validated `GenConfig`.
pub trait ConfigSource {
    fn load(&mut self, cores: &CoreSet) -> Result<GenConfig>;
}

/// Picks the YAML loader when a config file is given, otherwise prompts on
/// the terminal.
pub fn build_source(
    config: Option<PathBuf>,
    mode: Option<ModeArg>,
) -> Box<dyn ConfigSource> {
    match config {
        Some(path) => Box::new(yaml::YamlSource::new(path)),
        None => Box::new(terminal_prompter(mode)),
    }
}

fn terminal_prompter(mode: Option<ModeArg>) -> prompt::Prompter<BufReader<Stdin>, Stdout> {
    prompt::Prompter::new(BufReader::new(io::stdin()), io::stdout()).with_mode(mode)
}

/// Creates the workspace directory if it does not exist yet.
pub fn ensure_workspace(workspace: &Path) -> Result<()> {
    if workspace.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(workspace).map_err(|e| GenError::io(workspace, e))
}
