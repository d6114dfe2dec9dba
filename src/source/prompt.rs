use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use tracing::debug;

use crate::{
    error::{GenError, Result},
    model::{
        cli::ModeArg,
        config::{GenConfig, RunMode, StatBackend},
        cores::CoreSet,
    },
    source::{
        ConfigSource,
        DEFAULT_DURATION_SECS,
        DEFAULT_MPP,
        DEFAULT_RECORD_EVENTS,
        DEFAULT_RECORD_FREQUENCY,
        DEFAULT_STAT_EVENTS,
        DEFAULT_STAT_INTERVAL_MS,
        DEFAULT_WORKSPACE,
    },
    validate::{
        DEFAULT_CORE_RANGE,
        pin_command,
        validate_choice,
        validate_command,
        validate_core_range,
        require_positive,
        validate_number,
    },
};

const YES_NO: [&str; 2] = ["Yes", "No"];
const BACKENDS: [&str; 2] = ["perf-stat", "emon"];
const MODES: [&str; 2] = ["pipa", "user"];

/// Asks for every field line by line. An empty answer takes the default.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    mode: Option<ModeArg>,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            mode: None,
        }
    }

    /// Pre-answers the run-mode question.
    pub fn with_mode(mut self, mode: Option<ModeArg>) -> Self {
        self.mode = mode;
        self
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String> {
        match default {
            Some(d) if !d.is_empty() => write!(self.output, "{question} (Default: {d})\n> "),
            _ => write!(self.output, "{question}\n> "),
        }
        .and_then(|_| self.output.flush())
        .map_err(|e| GenError::io("<stdout>", e))?;

        let mut line = String::new();
        // EOF reads as an empty answer.
        self.input
            .read_line(&mut line)
            .map_err(|e| GenError::io("<stdin>", e))?;
        Ok(line.trim().to_string())
    }

    fn text(&mut self, question: &str, default: &str) -> Result<String> {
        let answer = self.ask(question, Some(default))?;
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    fn number(&mut self, field: &str, question: &str, default: u64) -> Result<u64> {
        let answer = self.ask(question, Some(&default.to_string()))?;
        require_positive(validate_number(&answer, default)?, field)
    }

    fn select<'a>(&mut self, question: &str, choices: &[&'a str], default: &'a str) -> Result<&'a str> {
        let question = format!("{question} [{}]", choices.join("/"));
        let answer = self.ask(&question, Some(default))?;
        validate_choice(&answer, choices, default)
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let default = if default { "Yes" } else { "No" };
        Ok(self.select(question, &YES_NO, default)? == "Yes")
    }

    fn ask_stat(&mut self) -> Result<StatBackend> {
        let backend = self.select("Do you want to use perf-stat or emon?", &BACKENDS, "perf-stat")?;
        if backend == "emon" {
            let mpp = self.text("Where is the mpp?", DEFAULT_MPP)?;
            return Ok(StatBackend::Emon {
                mpp: PathBuf::from(mpp),
            });
        }

        let interval_ms = self.number(
            "count_delta_stat",
            "What's the count delta of perf-stat, in milliseconds?",
            DEFAULT_STAT_INTERVAL_MS,
        )?;
        let events = self.text("What's the event of perf-stat?", DEFAULT_STAT_EVENTS)?;
        Ok(StatBackend::PerfStat {
            interval_ms,
            events,
        })
    }

    fn ask_mode(&mut self, cores: &CoreSet) -> Result<RunMode> {
        let mode = match self.mode {
            Some(mode) => mode,
            None => match self.select("Who starts the workload, pipa or user?", &MODES, "pipa")? {
                "user" => ModeArg::ByUser,
                _ => ModeArg::ByPipa,
            },
        };

        match mode {
            ModeArg::ByPipa => self.ask_workload(cores),
            ModeArg::ByUser => Ok(RunMode::ByUser {
                duration_record: self.number(
                    "duration_record",
                    "How many seconds should perf-record sample?",
                    DEFAULT_DURATION_SECS,
                )?,
                duration_stat: self.number(
                    "duration_stat",
                    "How many seconds should perf-stat count?",
                    DEFAULT_DURATION_SECS,
                )?,
            }),
        }
    }

    fn ask_workload(&mut self, cores: &CoreSet) -> Result<RunMode> {
        // Range is checked right away so a typo fails before the command prompt.
        let selection = if self.confirm("Whether to use taskset?", false)? {
            let raw = self.ask(
                &format!(
                    "Which cores do you want to use? (available: {}-{})",
                    cores.min(),
                    cores.max()
                ),
                Some(DEFAULT_CORE_RANGE),
            )?;
            Some(validate_core_range(&raw, cores)?)
        } else {
            None
        };

        let raw = self.ask("What's the command of workload?", None)?;
        let command = validate_command(&raw)?;
        let command = match selection {
            Some(selection) => pin_command(&selection, &command),
            None => command,
        };
        Ok(RunMode::ByPipa { command })
    }
}

impl<R: BufRead, W: Write> ConfigSource for Prompter<R, W> {
    fn load(&mut self, cores: &CoreSet) -> Result<GenConfig> {
        let workspace = self.text("Where do you want to store your data?", DEFAULT_WORKSPACE)?;
        let record_frequency = self.number(
            "freq_record",
            "What's the frequency of perf-record?",
            DEFAULT_RECORD_FREQUENCY,
        )?;
        let record_events =
            self.text("What's the event of perf-record?", DEFAULT_RECORD_EVENTS)?;
        let annotate = self.confirm("Whether to use perf-annotate?", false)?;
        let stat = self.ask_stat()?;
        let mode = self.ask_mode(cores)?;

        let config = GenConfig {
            workspace: PathBuf::from(workspace),
            record_frequency,
            record_events,
            stat,
            annotate,
            mode,
        };
        debug!(?config, "collected answers");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn run(answers: &str, mode: Option<ModeArg>) -> Result<GenConfig> {
        let mut prompter = Prompter::new(Cursor::new(answers.to_string()), Vec::new()).with_mode(mode);
        prompter.load(&CoreSet::span(0, 7))
    }

    #[test]
    fn defaults_with_command() {
        // workspace, freq, events, annotate, backend, interval, stat events,
        // mode, taskset, command
        let config = run("\n\n\n\n\n\n\n\n\n./bench\n", None).unwrap();
        assert_eq!(
            config,
            GenConfig {
                workspace: PathBuf::from("./"),
                record_frequency: 999,
                record_events: "{cycles,instructions}:S".to_string(),
                stat: StatBackend::PerfStat {
                    interval_ms: 1000,
                    events: DEFAULT_STAT_EVENTS.to_string(),
                },
                annotate: false,
                mode: RunMode::ByPipa {
                    command: "./bench".to_string()
                },
            }
        );
    }

    #[test]
    fn taskset_and_emon() {
        let answers = "./out\n99\ncycles\nYes\nemon\n/opt/emon\npipa\nYes\n2-4\n./bench -n 3\n";
        let config = run(answers, None).unwrap();
        assert_eq!(config.workspace, PathBuf::from("./out"));
        assert_eq!(config.record_frequency, 99);
        assert!(config.annotate);
        assert_eq!(
            config.stat,
            StatBackend::Emon {
                mpp: PathBuf::from("/opt/emon")
            }
        );
        assert_eq!(
            config.mode,
            RunMode::ByPipa {
                command: "/usr/bin/taskset -c 2,3,4 ./bench -n 3".to_string()
            }
        );
    }

    #[test]
    fn mode_flag_skips_question() {
        // No mode answer in the script; durations follow the stat answers.
        let config = run("\n\n\n\n\n\n\n30\n10\n", Some(ModeArg::ByUser)).unwrap();
        assert_eq!(
            config.mode,
            RunMode::ByUser {
                duration_record: 30,
                duration_stat: 10
            }
        );
    }

    #[test]
    fn bad_number_fails_fast() {
        let err = run("./\nfast\n", None).unwrap_err();
        assert!(matches!(err, GenError::InvalidInput(_)));
    }

    #[test]
    fn zero_frequency_or_interval_fails() {
        let err = run("./\n0\n", None).unwrap_err();
        assert!(matches!(err, GenError::InvalidInput(_)));

        let err = run("\n\n\n\n\n0\n", None).unwrap_err();
        assert!(matches!(err, GenError::InvalidInput(_)));
    }

    #[test]
    fn zero_duration_fails() {
        let err = run("\n\n\n\n\n\n\n0\n10\n", Some(ModeArg::ByUser)).unwrap_err();
        assert!(matches!(err, GenError::InvalidInput(_)));
    }

    #[test]
    fn bad_range_fails_before_command() {
        let err = run("\n\n\n\n\n\n\npipa\nYes\n9-3\n./bench\n", None).unwrap_err();
        assert!(matches!(err, GenError::InvalidRange(_)));
    }

    #[test]
    fn missing_command_fails() {
        let err = run("\n\n\n\n\n\n\n\n\n\n", None).unwrap_err();
        assert!(matches!(err, GenError::MissingCommand));
    }

    #[test]
    fn unknown_backend_fails() {
        let err = run("\n\n\n\nvtune\n", None).unwrap_err();
        assert!(matches!(err, GenError::InvalidChoice { .. }));
    }

    #[test]
    fn questions_show_defaults() {
        let mut prompter = Prompter::new(Cursor::new("\n\n\n\n\n\n\n\n\n./bench\n"), Vec::new());
        prompter.load(&CoreSet::span(0, 7)).unwrap();
        let shown = String::from_utf8(prompter.into_output()).unwrap();
        assert!(shown.contains("What's the frequency of perf-record? (Default: 999)"));
        assert!(shown.contains("Whether to use perf-annotate? [Yes/No] (Default: No)"));
    }
}
