mod cli;
mod error;
mod hardware;
mod model;
mod script;
mod source;
mod validate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use time::OffsetDateTime;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    model::{config::GenConfig, cores::CoreSet},
    script::{render_script, writer::write_script},
    source::{build_source, ensure_workspace},
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.config.is_some() && cli.mode.is_some() {
        warn!("--mode is ignored with --config, run_by_perf decides");
    }

    let cores = hardware::load_cores().context("cannot enumerate CPU cores")?;

    let mut source = build_source(cli.config, cli.mode);
    let config = source.load(&cores)?;

    let path = generate(&config, &cores, OffsetDateTime::now_utc())?;
    println!("Shell script generated successfully.");
    println!("Please check the script in {}", path.display());
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Creates the workspace, then renders and writes the script into it.
fn generate(config: &GenConfig, cores: &CoreSet, generated_at: OffsetDateTime) -> Result<PathBuf> {
    ensure_workspace(&config.workspace)?;

    let text = render_script(config, cores, generated_at);
    let path = write_script(&config.workspace, &text)
        .with_context(|| format!("cannot write script into {}", config.workspace.display()))?;

    info!(
        path = %path.display(),
        backend = config.stat.label(),
        annotate = config.annotate,
        "generated"
    );
    Ok(path)
}
