use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::model::cli::ModeArg;

#[derive(Parser, Debug)]
#[command(
    name = "pipa-gen",
    about = "Generate a perf/sar collection script (pipa-run.sh)",
    long_about = None
)]
pub struct Cli {
    /// Load answers from a YAML file instead of prompting
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip the run-mode question (interactive only)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
