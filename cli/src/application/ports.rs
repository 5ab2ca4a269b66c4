//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::{CommandError, PathError};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// What to keep from a command's standard output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// Drain and drop everything.
    Discard,
    /// Keep the first line, newline stripped; drop the rest.
    FirstLine,
}

/// A command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Normalized exit code, always non-negative.
    pub exit_code: i32,
    /// Present only for `Capture::FirstLine`.
    pub first_line: Option<String>,
}

impl CommandOutcome {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Abstracts process execution so infrastructure can be swapped or faked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run `program` with an argument vector (no shell) and wait for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned, is killed before
    /// reporting an exit code, or outlives the runner's timeout.
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        capture: Capture,
    ) -> Result<CommandOutcome, CommandError>;
}

// ── Path Port ─────────────────────────────────────────────────────────────────

/// Source of the user's home directory.
pub trait HomeDir {
    /// Resolve the home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no source yields a usable path.
    fn home(&self) -> Result<PathBuf, PathError>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts the handful of filesystem operations key provisioning needs.
pub trait LocalFs {
    /// Whether mode bits are meaningful on this host. Resolved once.
    fn supports_posix_permissions(&self) -> bool;

    fn exists(&self, path: &Path) -> bool;

    /// Create a single directory with `mode`.
    fn create_dir(&self, path: &Path, mode: u32) -> Result<()>;

    /// Permission bits (`& 0o777`) of `path`.
    fn mode(&self, path: &Path) -> Result<u32>;

    fn set_mode(&self, path: &Path, mode: u32) -> Result<()>;

    /// Read at most `max` bytes from the start of `path`.
    fn read_prefix(&self, path: &Path, max: usize) -> Result<Vec<u8>>;

    fn remove_file(&self, path: &Path) -> Result<()>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

/// Reporter that drops every event.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts loading of the persisted configuration.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when none is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored file cannot be read, parsed, or validated.
    fn load(&self) -> Result<crate::domain::AuthConfig>;

    /// Location of the configuration file, if one can be determined.
    fn path(&self) -> Option<PathBuf>;
}
