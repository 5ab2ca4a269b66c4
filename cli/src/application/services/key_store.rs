//! Application service: key pair existence, generation, and inspection.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! The filesystem is the only state: every call re-resolves paths and
//! re-observes the files.

use std::path::{Path, PathBuf};

use crate::application::ports::{Capture, CommandRunner, HomeDir, LocalFs};
use crate::application::services::ssh_dir;
use crate::domain::key::{
    MAX_KEY_LENGTH, PRIVATE_KEY_MODE, PROBE_LENGTH, PUBLIC_KEY_MODE, strip_one_newline,
};
use crate::domain::{AuthError, KeyPair, KeyType, PathError, paths};

/// Key operations against one home directory and one keygen program.
pub struct KeyStore<'a, R, F, H> {
    runner: &'a R,
    fs: &'a F,
    home: &'a H,
    keygen: &'a str,
}

impl<'a, R, F, H> KeyStore<'a, R, F, H>
where
    R: CommandRunner,
    F: LocalFs,
    H: HomeDir,
{
    #[must_use]
    pub fn new(runner: &'a R, fs: &'a F, home: &'a H, keygen: &'a str) -> Self {
        Self {
            runner,
            fs,
            home,
            keygen,
        }
    }

    fn key_paths(&self, key: KeyType) -> Result<(PathBuf, PathBuf), PathError> {
        paths::key_paths(&self.home.home()?, key)
    }

    /// Whether the keygen program can be run.
    ///
    /// `--help` is tried first; most builds print usage and exit 1. When it
    /// yields anything other than 0 or 1, `-V` gets a second chance.
    pub async fn keygen_available(&self) -> bool {
        let code = match self.probe(&["--help"]).await {
            code @ Some(0 | 1) => code,
            _ => self.probe(&["-V"]).await,
        };
        matches!(code, Some(0 | 1))
    }

    async fn probe(&self, args: &[&str]) -> Option<i32> {
        match self.runner.run(self.keygen, args, Capture::Discard).await {
            Ok(outcome) => Some(outcome.exit_code),
            Err(e) => {
                tracing::debug!(keygen = self.keygen, error = %e, "keygen probe failed");
                None
            }
        }
    }

    /// Create or repair `~/.ssh`.
    ///
    /// # Errors
    ///
    /// See [`ssh_dir::ensure_ssh_directory`].
    pub fn ensure_ssh_directory(&self) -> Result<(), AuthError> {
        ssh_dir::ensure_ssh_directory(self.fs, self.home)
    }

    /// Both files of the pair are present. Unresolvable paths count as absent.
    pub fn exists(&self, key: KeyType) -> bool {
        self.key_paths(key)
            .is_ok_and(|(private, public)| self.fs.exists(&private) && self.fs.exists(&public))
    }

    /// Generate a key pair of type `key`.
    ///
    /// An existing pair is kept unless `force` is set, in which case its files
    /// are removed first so the keygen program never prompts to overwrite.
    ///
    /// # Errors
    ///
    /// - `AuthError::OpensshNotFound` if the keygen program is unavailable.
    /// - `AuthError::SshDir` / `AuthError::Permissions` from the directory check.
    /// - `AuthError::KeyGen` if old files cannot be removed or keygen fails.
    /// - `AuthError::Permissions` if the new files cannot be chmodded.
    pub async fn generate(&self, key: KeyType, force: bool) -> Result<(), AuthError> {
        if !self.keygen_available().await {
            return Err(AuthError::OpensshNotFound);
        }
        self.ensure_ssh_directory()?;

        if !force && self.exists(key) {
            tracing::debug!(%key, "key pair already present");
            return Ok(());
        }

        let (private, public) = self.key_paths(key).map_err(|e| {
            tracing::debug!(error = %e, "cannot build key paths");
            AuthError::SshDir
        })?;
        if force {
            self.remove_if_present(&private)?;
            self.remove_if_present(&public)?;
        }
        let target = private.to_str().ok_or_else(|| {
            tracing::debug!(path = %private.display(), "key path is not valid UTF-8");
            AuthError::SshDir
        })?;

        let mut args: Vec<&str> = key.keygen_args().to_vec();
        args.extend(["-f", target, "-N", "", "-q"]);
        tracing::info!(%key, path = target, force, "generating key pair");

        match self.runner.run(self.keygen, &args, Capture::Discard).await {
            Ok(outcome) if outcome.success() => {}
            Ok(outcome) => {
                tracing::info!(%key, exit_code = outcome.exit_code, "keygen exited with failure");
                return Err(AuthError::KeyGen);
            }
            Err(e) => {
                tracing::info!(%key, error = %e, "keygen did not run");
                return Err(AuthError::KeyGen);
            }
        }

        self.apply_mode(&private, PRIVATE_KEY_MODE)?;
        self.apply_mode(&public, PUBLIC_KEY_MODE)
    }

    fn remove_if_present(&self, path: &Path) -> Result<(), AuthError> {
        if !self.fs.exists(path) {
            return Ok(());
        }
        self.fs.remove_file(path).map_err(|e| {
            tracing::info!(error = ?e, "cannot remove old key file");
            AuthError::KeyGen
        })
    }

    fn apply_mode(&self, path: &Path, mode: u32) -> Result<(), AuthError> {
        if !self.fs.supports_posix_permissions() {
            return Ok(());
        }
        self.fs.set_mode(path, mode).map_err(|e| {
            tracing::debug!(error = ?e, "chmod failed");
            AuthError::Permissions
        })
    }

    /// `~/.ssh/<stem>.pub`
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SshDir` if the path cannot be resolved.
    pub fn public_key_path(&self, key: KeyType) -> Result<PathBuf, AuthError> {
        self.key_paths(key).map(|(_, public)| public).map_err(|e| {
            tracing::debug!(error = %e, "cannot build public key path");
            AuthError::SshDir
        })
    }

    /// Public key text: at most `max_length - 1` bytes, one trailing newline
    /// removed. Bytes that are not UTF-8 show up as U+FFFD.
    ///
    /// # Errors
    ///
    /// - `AuthError::Buffer` if `max_length` is zero.
    /// - `AuthError::SshDir` if the path cannot be resolved.
    /// - `AuthError::ReadKey` if the file is missing or unreadable.
    pub fn public_key_content(&self, key: KeyType, max_length: usize) -> Result<String, AuthError> {
        if max_length == 0 {
            return Err(AuthError::Buffer);
        }
        let bytes = self.public_key_bytes(key, max_length - 1)?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(strip_one_newline(&text).to_string())
    }

    /// Whether the public key can be read and holds something other than
    /// whitespace in its first `PROBE_LENGTH - 1` bytes. Encoding is not
    /// checked.
    pub fn public_key_intact(&self, key: KeyType) -> bool {
        self.public_key_bytes(key, PROBE_LENGTH - 1)
            .is_ok_and(|bytes| bytes.iter().any(|b| !b.is_ascii_whitespace()))
    }

    fn public_key_bytes(&self, key: KeyType, max: usize) -> Result<Vec<u8>, AuthError> {
        let path = self.public_key_path(key)?;
        if !self.fs.exists(&path) {
            return Err(AuthError::ReadKey);
        }
        self.fs.read_prefix(&path, max).map_err(|e| {
            tracing::debug!(error = ?e, "cannot read public key");
            AuthError::ReadKey
        })
    }

    /// Reapply 0600 / 0644 to whichever of the two files exist.
    ///
    /// # Errors
    ///
    /// - `AuthError::SshDir` if the paths cannot be resolved.
    /// - `AuthError::Permissions` if a chmod fails.
    pub fn fix_permissions(&self, key: KeyType) -> Result<(), AuthError> {
        let (private, public) = self.key_paths(key).map_err(|_| AuthError::SshDir)?;
        for (path, mode) in [(private, PRIVATE_KEY_MODE), (public, PUBLIC_KEY_MODE)] {
            if self.fs.exists(&path) {
                self.apply_mode(&path, mode)?;
            }
        }
        Ok(())
    }

    /// Current on-disk view of the pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SshDir` if the paths cannot be resolved.
    pub fn key_pair(&self, key: KeyType) -> Result<KeyPair, AuthError> {
        let (private_path, public_path) = self.key_paths(key).map_err(|_| AuthError::SshDir)?;
        Ok(KeyPair {
            key_type: key,
            exists: self.exists(key),
            public_key: self.public_key_content(key, MAX_KEY_LENGTH).ok(),
            private_path,
            public_path,
        })
    }
}
