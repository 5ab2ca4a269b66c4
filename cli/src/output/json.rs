//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one object: the success object
//! from [`format_prepared`] or the error object from [`format_error`].

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::{KeyType, PreparedKey};

#[derive(Serialize)]
struct PreparedOutput<'a> {
    public_key_path: String,
    key_type: KeyType,
    public_key: Option<&'a str>,
}

/// Format the success object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "public_key_path": "/home/user/.ssh/id_ed25519.pub",
///   "key_type": "ed25519",
///   "public_key": "ssh-ed25519 AAAA... user@host"
/// }
/// ```
///
/// `public_key` is `null` when the content could not be read.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_prepared(prepared: &PreparedKey, public_key: Option<&str>) -> Result<String> {
    let out = PreparedOutput {
        public_key_path: prepared.public_key_path.display().to_string(),
        key_type: prepared.key_type,
        public_key,
    };
    serde_json::to_string_pretty(&out).context("JSON serialization failed")
}

/// Format the error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}
