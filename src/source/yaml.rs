use std::{fs, path::PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::{
    error::{GenError, Result},
    model::{
        config::{GenConfig, RunMode, StatBackend},
        cores::CoreSet,
    },
    source::{ConfigSource, DEFAULT_MPP},
    validate::{build_command, require_positive, validate_command, validate_number},
};

/// YAML scalars that may be written either quoted or bare.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(u64),
    Text(String),
}

impl Scalar {
    fn as_text(&self) -> String {
        match self {
            Scalar::Int(n) => n.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }
}

/// Flat file layout, keys as written by the interactive tool.
#[derive(Debug, Deserialize)]
struct RawConfig {
    workspace: Option<String>,
    freq_record: Option<Scalar>,
    events_record: Option<String>,
    count_delta_stat: Option<Scalar>,
    events_stat: Option<String>,
    #[serde(alias = "annotate")]
    annotete: Option<bool>,
    run_by_perf: Option<bool>,
    #[serde(default)]
    use_emon: bool,
    mpp: Option<String>,

    // run by pipa
    #[serde(default)]
    use_taskset: bool,
    core_range: Option<Scalar>,
    command: Option<String>,

    // run by user
    duration_record: Option<Scalar>,
    duration_stat: Option<Scalar>,
}

pub struct YamlSource {
    path: PathBuf,
}

impl YamlSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigSource for YamlSource {
    fn load(&mut self, cores: &CoreSet) -> Result<GenConfig> {
        let text = fs::read_to_string(&self.path).map_err(|e| GenError::io(&self.path, e))?;
        info!(path = %self.path.display(), "loading config");
        parse_config(&text, cores)
    }
}

pub fn parse_config(text: &str, cores: &CoreSet) -> Result<GenConfig> {
    let raw: RawConfig =
        serde_yaml::from_str(text).map_err(|e| GenError::config(e.to_string()))?;

    let workspace = required(raw.workspace, "workspace")?;
    let record_frequency = number(raw.freq_record, "freq_record")?;
    let record_events = required(raw.events_record, "events_record")?;
    let annotate = raw.annotete.unwrap_or(false);

    let stat = if raw.use_emon {
        StatBackend::Emon {
            mpp: PathBuf::from(raw.mpp.unwrap_or_else(|| DEFAULT_MPP.to_string())),
        }
    } else {
        StatBackend::PerfStat {
            interval_ms: number(raw.count_delta_stat, "count_delta_stat")?,
            events: required(raw.events_stat, "events_stat")?,
        }
    };

    let mode = if required(raw.run_by_perf, "run_by_perf")? {
        let command = validate_command(&raw.command.unwrap_or_default())?;
        let core_range = match (&raw.core_range, raw.use_taskset) {
            (Some(range), _) => range.as_text(),
            (None, false) => String::new(),
            (None, true) => return Err(missing("core_range")),
        };
        RunMode::ByPipa {
            command: build_command(raw.use_taskset, &core_range, &command, cores)?,
        }
    } else {
        RunMode::ByUser {
            duration_record: number(raw.duration_record, "duration_record")?,
            duration_stat: number(raw.duration_stat, "duration_stat")?,
        }
    };

    Ok(GenConfig {
        workspace: PathBuf::from(workspace),
        record_frequency,
        record_events,
        stat,
        annotate,
        mode,
    })
}

fn missing(field: &str) -> GenError {
    GenError::config(format!("missing field `{field}`"))
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| missing(field))
}

fn number(value: Option<Scalar>, field: &str) -> Result<u64> {
    let text = required(value, field)?.as_text();
    if text.trim().is_empty() {
        return Err(missing(field));
    }
    // Default is unreachable: blank text was rejected above.
    require_positive(validate_number(&text, 0)?, field)
}
