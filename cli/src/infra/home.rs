//! Home directory resolution: implements the `HomeDir` port.
//!
//! `HOME` wins. Windows falls back to `USERPROFILE`, then `HOMEDRIVE` +
//! `HOMEPATH`; every platform finally asks the OS user database.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::application::ports::HomeDir;
use crate::domain::key::MAX_PATH_LENGTH;
use crate::domain::PathError;

/// Production `HomeDir` backed by the process environment.
pub struct EnvHome;

impl HomeDir for EnvHome {
    fn home(&self) -> Result<PathBuf, PathError> {
        resolve_home()
    }
}

/// Resolve the home directory from the real environment.
///
/// # Errors
///
/// See [`resolve_home_with`].
pub fn resolve_home() -> Result<PathBuf, PathError> {
    resolve_home_with(|key| std::env::var_os(key), dirs::home_dir)
}

/// Resolve the home directory from injected sources.
///
/// # Errors
///
/// - `PathError::NoHome` if no source yields a non-empty path.
/// - `PathError::TooLong` if the path does not fit in `MAX_PATH_LENGTH`.
pub fn resolve_home_with(
    var: impl Fn(&str) -> Option<OsString>,
    user_db: impl FnOnce() -> Option<PathBuf>,
) -> Result<PathBuf, PathError> {
    let non_empty = |key: &str| var(key).filter(|v| !v.is_empty());

    let home = non_empty("HOME")
        .map(PathBuf::from)
        .or_else(|| windows_profile(&non_empty))
        .or_else(|| user_db().filter(|p| !p.as_os_str().is_empty()))
        .ok_or(PathError::NoHome)?;

    if home.as_os_str().len() >= MAX_PATH_LENGTH {
        return Err(PathError::TooLong {
            path: home.display().to_string(),
            max: MAX_PATH_LENGTH,
        });
    }
    Ok(home)
}

#[cfg(windows)]
fn windows_profile(var: &impl Fn(&str) -> Option<OsString>) -> Option<PathBuf> {
    if let Some(profile) = var("USERPROFILE") {
        return Some(PathBuf::from(profile));
    }
    let mut joined = var("HOMEDRIVE")?;
    joined.push(var("HOMEPATH")?);
    Some(PathBuf::from(joined))
}

#[cfg(not(windows))]
fn windows_profile(_var: &impl Fn(&str) -> Option<OsString>) -> Option<PathBuf> {
    None
}
