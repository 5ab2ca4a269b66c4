//! Domain types and validators for krown-auth configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_KEYGEN: &str = "ssh-keygen";
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 120;
pub const MAX_COMMAND_TIMEOUT_SECS: u64 = 3600;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.krown/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Keygen program, looked up on `PATH` unless absolute.
    pub keygen: String,
    /// Upper bound on each external command, in seconds.
    pub command_timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            keygen: DEFAULT_KEYGEN.to_string(),
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
        }
    }
}

impl AuthConfig {
    /// Validates field ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if `keygen` is blank or the timeout is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keygen.trim().is_empty() {
            return Err(ConfigError::EmptyKeygen);
        }
        if !(1..=MAX_COMMAND_TIMEOUT_SECS).contains(&self.command_timeout_secs) {
            return Err(ConfigError::InvalidTimeout(self.command_timeout_secs));
        }
        Ok(())
    }

    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}
