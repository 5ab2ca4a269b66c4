//! Canonical paths under the SSH directory.
//!
//! Pure path arithmetic with the fixed length bound every path must respect.

use std::path::{Path, PathBuf};

use crate::domain::error::PathError;
use crate::domain::key::{KeyType, MAX_PATH_LENGTH, SSH_DIR_NAME};

/// Rejects paths that would not fit in `MAX_PATH_LENGTH` (terminator included).
///
/// # Errors
///
/// Returns `PathError::TooLong` when `path` is `MAX_PATH_LENGTH` bytes or longer.
pub fn bounded(path: PathBuf) -> Result<PathBuf, PathError> {
    if path.as_os_str().len() >= MAX_PATH_LENGTH {
        return Err(PathError::TooLong {
            path: path.display().to_string(),
            max: MAX_PATH_LENGTH,
        });
    }
    Ok(path)
}

/// `<home>/.ssh`
///
/// # Errors
///
/// Returns an error if `home` is empty or the result is too long.
pub fn ssh_dir(home: &Path) -> Result<PathBuf, PathError> {
    if home.as_os_str().is_empty() {
        return Err(PathError::NoHome);
    }
    bounded(home.join(SSH_DIR_NAME))
}

/// `<home>/.ssh/<filename>`
///
/// # Errors
///
/// Returns an error if `home` is empty or the result is too long.
pub fn ssh_path(home: &Path, filename: &str) -> Result<PathBuf, PathError> {
    bounded(ssh_dir(home)?.join(filename))
}

/// Private and public key paths for `key`.
///
/// # Errors
///
/// Returns an error if either path cannot be built.
pub fn key_paths(home: &Path, key: KeyType) -> Result<(PathBuf, PathBuf), PathError> {
    Ok((
        ssh_path(home, key.file_stem())?,
        ssh_path(home, &key.public_file_name())?,
    ))
}
