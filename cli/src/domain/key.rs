//! SSH key types, file naming, and the canonical permission modes.
//!
//! Pure data, no I/O.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ── Constants ────────────────────────────────────────────────────────────────

/// Mode required on the `.ssh` directory.
pub const SSH_DIR_MODE: u32 = 0o700;
/// Mode applied to private key files.
pub const PRIVATE_KEY_MODE: u32 = 0o600;
/// Mode applied to public key files.
pub const PUBLIC_KEY_MODE: u32 = 0o644;

/// Paths must be strictly shorter than this many bytes.
pub const MAX_PATH_LENGTH: usize = 512;
/// Capacity used when reading a full public key for display.
pub const MAX_KEY_LENGTH: usize = 8192;
/// Capacity of the integrity probe read.
pub const PROBE_LENGTH: usize = 256;

/// Name of the SSH configuration directory under the home directory.
pub const SSH_DIR_NAME: &str = ".ssh";

// ── KeyType ──────────────────────────────────────────────────────────────────

/// The two key algorithms the provisioner knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    #[serde(rename = "ed25519")]
    Ed25519,
    #[serde(rename = "rsa-4096")]
    Rsa4096,
}

impl KeyType {
    /// Preferred type, tried first.
    pub const PREFERRED: KeyType = KeyType::Ed25519;

    /// Base file name of the private key, e.g. `id_ed25519`.
    #[must_use]
    pub fn file_stem(self) -> &'static str {
        match self {
            KeyType::Ed25519 => "id_ed25519",
            KeyType::Rsa4096 => "id_rsa",
        }
    }

    /// File name of the public key, e.g. `id_ed25519.pub`.
    #[must_use]
    pub fn public_file_name(self) -> String {
        format!("{}.pub", self.file_stem())
    }

    /// Algorithm arguments passed to the keygen tool.
    #[must_use]
    pub fn keygen_args(self) -> &'static [&'static str] {
        match self {
            KeyType::Ed25519 => &["-t", "ed25519"],
            KeyType::Rsa4096 => &["-t", "rsa", "-b", "4096"],
        }
    }

    /// The alternate type used for fallback.
    #[must_use]
    pub fn other(self) -> KeyType {
        match self {
            KeyType::Ed25519 => KeyType::Rsa4096,
            KeyType::Rsa4096 => KeyType::Ed25519,
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyType::Ed25519 => "ed25519",
            KeyType::Rsa4096 => "rsa-4096",
        })
    }
}

// ── KeyPair ──────────────────────────────────────────────────────────────────

/// Snapshot of one key pair as observed on disk.
///
/// Built on demand and never cached; the filesystem is the source of truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub key_type: KeyType,
    pub private_path: PathBuf,
    pub public_path: PathBuf,
    /// Both files are present.
    pub exists: bool,
    /// Public key line, when readable.
    pub public_key: Option<String>,
}

/// Successful outcome of provisioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedKey {
    pub key_type: KeyType,
    pub public_key_path: PathBuf,
}

/// Strips a single trailing `\n` from raw file content.
#[must_use]
pub fn strip_one_newline(content: &str) -> &str {
    content.strip_suffix('\n').unwrap_or(content)
}
