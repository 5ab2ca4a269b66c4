//! Application service: guarantees `~/.ssh` exists with mode 0700.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use crate::application::ports::{HomeDir, LocalFs};
use crate::domain::key::SSH_DIR_MODE;
use crate::domain::{AuthError, paths};

/// Create `~/.ssh` if missing, otherwise repair its mode.
///
/// Without POSIX permissions only existence is ensured. A mode that cannot
/// be read is left alone.
///
/// # Errors
///
/// - `AuthError::SshDir` if home cannot be resolved or the directory cannot
///   be created.
/// - `AuthError::Permissions` if a wrong mode cannot be corrected.
pub fn ensure_ssh_directory(fs: &impl LocalFs, home: &impl HomeDir) -> Result<(), AuthError> {
    let dir = home
        .home()
        .and_then(|h| paths::ssh_dir(&h))
        .map_err(|e| {
            tracing::debug!(error = %e, "cannot locate ssh directory");
            AuthError::SshDir
        })?;

    if !fs.exists(&dir) {
        fs.create_dir(&dir, SSH_DIR_MODE).map_err(|e| {
            tracing::debug!(error = ?e, "mkdir failed");
            AuthError::SshDir
        })?;
        tracing::info!(path = %dir.display(), "created ssh directory");
        return Ok(());
    }

    if !fs.supports_posix_permissions() {
        return Ok(());
    }

    match fs.mode(&dir) {
        Ok(mode) if mode == SSH_DIR_MODE => {}
        Ok(mode) => {
            fs.set_mode(&dir, SSH_DIR_MODE).map_err(|e| {
                tracing::debug!(error = ?e, "chmod failed");
                AuthError::Permissions
            })?;
            tracing::info!(
                path = %dir.display(),
                from = %format_args!("{mode:o}"),
                "repaired ssh directory mode"
            );
        }
        Err(e) => tracing::debug!(error = ?e, "cannot read ssh directory mode, skipping"),
    }
    Ok(())
}
