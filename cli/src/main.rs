//! krown-auth - prepares this machine's SSH key pair for Krown

use std::process::ExitCode;

use clap::Parser;

use krown_auth::cli::{Cli, init_tracing};
use krown_auth::output::json;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json_mode = cli.json;

    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(error = ?e, "setup failed");
            match json::format_error(&format!("{e:#}"), "config") {
                Ok(obj) if json_mode => println!("{obj}"),
                _ => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
