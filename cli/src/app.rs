//! Application context: unified state passed to the command handler.
//!
//! `AppContext` owns the output context and every production adapter the
//! provisioning services need, so the handler only borrows.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::application::services::key_store::KeyStore;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::fs::HostFs;
use crate::infra::home::EnvHome;
use crate::output::OutputContext;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Keygen program that overrides the configured one.
    pub keygen: Option<String>,
}

/// Production key store as wired by [`AppContext::key_store`].
pub type HostKeyStore<'a> = KeyStore<'a, TokioCommandRunner, HostFs, EnvHome>;

/// Unified application context passed to the command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Keygen program, after CLI and config overrides.
    pub keygen: String,
    pub runner: TokioCommandRunner,
    pub fs: HostFs,
    pub home: EnvHome,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags and stored config.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read, parsed, or
    /// validated.
    pub fn new(flags: &AppFlags, store: &impl ConfigStore) -> Result<Self> {
        let mut config = store.load()?;
        if let Some(keygen) = flags.keygen.as_deref().filter(|k| !k.trim().is_empty()) {
            config.keygen = keygen.to_string();
        }
        tracing::debug!(
            source = ?store.path(),
            keygen = %config.keygen,
            timeout = ?config.command_timeout(),
            "resolved config"
        );

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            runner: TokioCommandRunner::new(config.command_timeout()),
            keygen: config.keygen,
            fs: HostFs::detect(),
            home: EnvHome,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// A key store over the production adapters.
    #[must_use]
    pub fn key_store(&self) -> HostKeyStore<'_> {
        KeyStore::new(&self.runner, &self.fs, &self.home, &self.keygen)
    }
}
