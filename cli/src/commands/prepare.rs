//! Prepare command: provisions the SSH key pair and prints its public half.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::{ProgressReporter, SilentReporter};
use crate::application::services::provision::{PREPARE_CAPACITY, Provisioner};
use crate::domain::{AuthError, KeyPair, PreparedKey};
use crate::output::{OutputContext, TerminalReporter, json};

/// Run provisioning and report the outcome.
///
/// A key whose content cannot be read afterwards is still a success; the
/// path is what callers need.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails. Provisioning failures
/// are reported to the user and turned into exit code 1.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let outcome = if app.is_json() {
        provision(app, &SilentReporter).await
    } else {
        app.output.header("krown-auth · preparing this machine for Krown");
        app.output.blank();
        let reporter = TerminalReporter::new(&app.output);
        provision(app, &reporter).await
    };

    match outcome {
        Ok((prepared, pair)) => {
            let content = pair.as_ref().and_then(|p| p.public_key.as_deref());
            if app.is_json() {
                println!("{}", json::format_prepared(&prepared, content)?);
            } else {
                render_success(&app.output, &prepared, pair.as_ref());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::debug!(code = e.code(), "provisioning failed");
            if app.is_json() {
                println!("{}", json::format_error(&e.to_string(), e.code())?);
            } else {
                render_failure(&app.output, e);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn provision(
    app: &AppContext,
    reporter: &impl ProgressReporter,
) -> Result<(PreparedKey, Option<KeyPair>), AuthError> {
    let provisioner = Provisioner::new(app.key_store(), reporter);
    let prepared = provisioner.prepare(PREPARE_CAPACITY).await?;
    let pair = provisioner
        .store()
        .key_pair(prepared.key_type)
        .inspect_err(|e| tracing::warn!(error = %e, "cannot inspect key pair after provisioning"))
        .ok();
    if pair.as_ref().is_some_and(|p| p.public_key.is_none()) {
        tracing::warn!(key = %prepared.key_type, "public key unreadable after provisioning");
    }
    Ok((prepared, pair))
}

fn render_success(ctx: &OutputContext, prepared: &PreparedKey, pair: Option<&KeyPair>) {
    ctx.path("Public key path:", &prepared.public_key_path);
    if let Some(pair) = pair {
        ctx.path("Private key path:", &pair.private_path);
    }
    ctx.kv("Key type:", &prepared.key_type.to_string());
    ctx.blank();
    match pair.and_then(|p| p.public_key.as_deref()) {
        Some(key) => {
            ctx.header("Public key (use with the Krown API):");
            ctx.raw(key);
        }
        None => {
            ctx.warn("Cannot read the public key content");
            ctx.path("The key exists at:", &prepared.public_key_path);
        }
    }
    ctx.blank();
    ctx.success("This machine is ready for Krown");
    ctx.success("SSH keys are generated and correctly permissioned");
}

fn render_failure(ctx: &OutputContext, e: AuthError) {
    ctx.error(&format!("Machine preparation failed: {e}"));
    let advice = e.advice();
    if !advice.is_empty() {
        eprintln!();
        for line in advice {
            ctx.hint(line);
        }
    }
}
