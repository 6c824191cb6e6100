#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that hosts the money tweaks plugin on a simulated
//! server and drives it from a session script.

mod config;
mod script;

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::{config::Config, script::Session};

/// Command-line arguments for the money tweaks host.
#[derive(Debug, Parser)]
#[command(name = "money-tweaks", about = "Hosts the money tweaks plugin on a simulated server")]
struct CliArgs {
    /// TOML file describing the server, connected players and plugin options.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Session script to run. Lines are read from stdin when omitted.
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,
}

/// Entry point for the money tweaks command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let mut session = Session::new(&config).context("failed to load the plugin")?;

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(File::open(path).with_context(|| {
            format!("failed to open session script {}", path.display())
        })?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (index, line) in input.lines().enumerate() {
        let line = line.context("failed to read session script")?;
        match session.execute(&line) {
            Ok(replies) => {
                for reply in replies {
                    writeln!(out, "{reply}")?;
                }
            }
            Err(error) => {
                warn!(line = index + 1, %error, "script line failed");
                writeln!(out, "error: {error}")?;
            }
        }
    }
    out.flush()?;

    session.shutdown();
    Ok(())
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
