//! Domain layer: pure types, constants, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod key;
pub mod paths;

pub use config::AuthConfig;
pub use error::{AuthError, CommandError, ConfigError, PathError};
pub use key::{KeyPair, KeyType, PreparedKey};
