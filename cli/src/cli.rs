//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::commands;
use crate::infra::config::YamlConfigStore;

/// Prepare this machine's SSH key pair for Krown
#[derive(Parser)]
#[command(name = "krown-auth", version)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Keygen program to use instead of the configured one
    #[arg(long, value_name = "PROGRAM", env = "KROWN_AUTH_KEYGEN")]
    pub keygen: Option<String>,
}

impl Cli {
    /// Execute the CLI.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or output
    /// cannot be serialized. Provisioning failures are not errors here;
    /// they come back as a failing exit code.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            keygen,
        } = self;
        let flags = AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            keygen,
        };
        let app = AppContext::new(&flags, &YamlConfigStore::from_env())?;
        commands::prepare::run(&app).await
    }
}

/// Default filter directive for a `-v` count.
#[must_use]
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level(verbose))),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}
