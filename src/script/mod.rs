pub mod writer;

use std::fmt::{self, Write};

use time::{OffsetDateTime, format_description::well_known::Iso8601};

use crate::model::{
    config::{GenConfig, StatBackend},
    cores::CoreSet,
};

pub const SCRIPT_NAME: &str = "pipa-run.sh";

/// Commands the generated script needs on `PATH`.
const REQUIRED_COMMANDS: [&str; 2] = ["sar", "perf"];

/// Renders the collection script for `config`.
///
/// Output only depends on the arguments, so a fixed `generated_at` gives
/// byte-identical scripts.
pub fn render_script(config: &GenConfig, cores: &CoreSet, generated_at: OffsetDateTime) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_script(&mut out, config, cores, generated_at);
    out
}

fn write_script<W: Write>(
    out: &mut W,
    config: &GenConfig,
    cores: &CoreSet,
    generated_at: OffsetDateTime,
) -> fmt::Result {
    write_header(out, generated_at)?;
    write_workspace(out, config)?;
    write_record_stage(out, config)?;
    write_activity_stage(out, config, cores)?;
    writeln!(out, "echo 'Performance data collected successfully.'")
}

fn write_header<W: Write>(out: &mut W, generated_at: OffsetDateTime) -> fmt::Result {
    let stamp = generated_at
        .format(&Iso8601::DEFAULT)
        .unwrap_or_else(|_| generated_at.unix_timestamp().to_string());

    writeln!(out, "#!/bin/bash")?;
    writeln!(out, "# The script generated by pipa-gen is used to collect performance data.")?;
    writeln!(out, "# Please check whether it meets expectations before running.")?;
    writeln!(out, "# Generated at {stamp}")?;
    writeln!(out)?;

    writeln!(out, "# Check if sar and perf are available")?;
    for cmd in REQUIRED_COMMANDS {
        writeln!(out, "if ! command -v {cmd} &> /dev/null; then")?;
        writeln!(out, "echo \"{cmd} command not found. Please install {cmd}.\"")?;
        writeln!(out, "exit 1")?;
        writeln!(out, "fi")?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_workspace<W: Write>(out: &mut W, config: &GenConfig) -> fmt::Result {
    let workspace = config.workspace.to_string_lossy();
    writeln!(out, "WORKSPACE={}", shell_quote(&workspace))?;
    writeln!(out, "mkdir -p \"$WORKSPACE\"")?;
    writeln!(out)
}

fn write_record_stage<W: Write>(out: &mut W, config: &GenConfig) -> fmt::Result {
    writeln!(
        out,
        "perf record -e {} -a -F {} -o \"$WORKSPACE/perf.data\" {}",
        shell_quote(&config.record_events),
        config.record_frequency,
        config.mode.record_target()
    )?;
    writeln!(out, "perf script -i \"$WORKSPACE/perf.data\" > \"$WORKSPACE/perf.script\"")?;
    writeln!(out, "perf report -i \"$WORKSPACE/perf.data\" > \"$WORKSPACE/perf.report\"")?;
    if config.annotate {
        writeln!(out, "perf annotate -i \"$WORKSPACE/perf.data\" > \"$WORKSPACE/perf.annotate\"")?;
    }
    writeln!(out)
}

fn write_activity_stage<W: Write>(out: &mut W, config: &GenConfig, cores: &CoreSet) -> fmt::Result {
    let target = config.mode.stat_target();

    writeln!(out, "sar -o \"$WORKSPACE/sar.dat\" 1 >/dev/null 2>&1 &")?;
    writeln!(out, "sar_pid=$!")?;
    match &config.stat {
        StatBackend::PerfStat {
            interval_ms,
            events,
        } => writeln!(
            out,
            "perf stat -e {} -C {} -A -x , -I {} -o \"$WORKSPACE/perf-stat.csv\" {}",
            shell_quote(events),
            cores.cpu_list(),
            interval_ms,
            target
        )?,
        StatBackend::Emon { mpp } => {
            let emon = mpp.join("emon");
            writeln!(
                out,
                "{} -collect-edp -f \"$WORKSPACE/emon.dat\" {}",
                shell_quote(&emon.to_string_lossy()),
                target
            )?
        }
    }
    writeln!(out, "kill -9 $sar_pid")?;
    writeln!(out, "sar -A -f \"$WORKSPACE/sar.dat\" >\"$WORKSPACE/sar.txt\"")?;
    writeln!(out)
}

/// Single-quotes `s` unless every char is shell-inert.
pub fn shell_quote(s: &str) -> String {
    let safe = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ',' | ':' | '=' | '+' | '@' | '%'));
    if safe {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}
