//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! `AuthError` is the closed set of provisioning failures; the lower-level
//! enums are folded into it at the service boundary.

use thiserror::Error;

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Every way provisioning can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("cannot create or access the .ssh directory")]
    SshDir,

    #[error("SSH key generation failed")]
    KeyGen,

    #[error("cannot set the required file permissions")]
    Permissions,

    #[error("OpenSSH client not found on this system")]
    OpensshNotFound,

    #[error("cannot read the public key")]
    ReadKey,

    #[error("output buffer is missing or too small")]
    Buffer,
}

impl AuthError {
    /// Stable machine-readable code used by `--json` output.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            AuthError::SshDir => "ssh_dir",
            AuthError::KeyGen => "key_gen",
            AuthError::Permissions => "permissions",
            AuthError::OpensshNotFound => "openssh_not_found",
            AuthError::ReadKey => "read_key",
            AuthError::Buffer => "buffer",
        }
    }

    /// Remediation hints shown under the error message.
    #[must_use]
    pub fn advice(self) -> &'static [&'static str] {
        match self {
            AuthError::OpensshNotFound => &[
                "Install the OpenSSH client:",
                "  - Ubuntu/Debian: sudo apt-get install openssh-client",
                "  - CentOS/RHEL: sudo yum install openssh-clients",
                "  - Arch: sudo pacman -S openssh",
                "  - macOS: OpenSSH ships with the system",
            ],
            AuthError::SshDir => &["Check the permissions of your home directory."],
            AuthError::KeyGen => &[
                "Check that ssh-keygen works correctly.",
                "  Test: ssh-keygen -V",
            ],
            AuthError::Permissions => {
                &["Check that you own ~/.ssh and the key files inside it."]
            }
            AuthError::ReadKey | AuthError::Buffer => &[],
        }
    }
}

// ── Path errors ───────────────────────────────────────────────────────────────

/// Failures while resolving the home directory or building paths under it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("cannot determine home directory")]
    NoHome,

    #[error("path exceeds {max} bytes: {path}")]
    TooLong { path: String, max: usize },
}

// ── Command errors ────────────────────────────────────────────────────────────

/// Failures of the external command primitive. Exit codes are not errors.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} terminated without an exit code")]
    NoExitCode { program: String },

    #[error("{program} timed out after {secs}s")]
    TimedOut { program: String, secs: u64 },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("keygen program must not be empty")]
    EmptyKeygen,

    #[error("Invalid command timeout: {0}s\n\nValid values: 1-3600")]
    InvalidTimeout(u64),
}
