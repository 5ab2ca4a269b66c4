//! Application service: the provisioning state machine.
//!
//! `prepare` walks a fixed sequence of stages. Each stage either fails,
//! finishes, or names the next stage; there are two bounded detours
//! (generation fallback and integrity recovery) and no loops.
//!
//! ```text
//! CheckTooling → EnsureDirectory → SelectKey ─┬─────────────────→ Recheck
//!                                             └→ GenerateFallback ─┘   │
//!   Output ← NormalizePermissions ←─┬──────────── ProbeIntegrity ←─────┘
//!                                   ├─ Regenerate ←─┘
//!                                   └─ Fallback ←───┘ (regeneration failed)
//! ```

use crate::application::ports::{CommandRunner, HomeDir, LocalFs, ProgressReporter};
use crate::application::services::key_store::KeyStore;
use crate::domain::{AuthError, KeyType, PreparedKey};

/// Capacity the CLI hands to [`Provisioner::prepare`].
pub const PREPARE_CAPACITY: usize = 512;

/// Length of the longest path through the machine.
const MAX_TRANSITIONS: usize = 10;

/// Named states of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    CheckTooling,
    EnsureDirectory,
    /// Prefer Ed25519, generating it if absent.
    SelectKey,
    /// Ed25519 generation failed; fall back to RSA-4096.
    GenerateFallback,
    /// Confirm the chosen pair really landed on disk.
    Recheck(KeyType),
    ProbeIntegrity(KeyType),
    /// The public key was unreadable; force a fresh pair.
    Regenerate(KeyType),
    /// Forced regeneration of the given type failed; switch to the other.
    Fallback(KeyType),
    NormalizePermissions(KeyType),
    Output(KeyType),
}

enum Transition {
    Next(Stage),
    Done(PreparedKey),
}

/// Drives a [`KeyStore`] to a single valid key pair.
pub struct Provisioner<'a, R, F, H, P> {
    store: KeyStore<'a, R, F, H>,
    reporter: &'a P,
}

impl<'a, R, F, H, P> Provisioner<'a, R, F, H, P>
where
    R: CommandRunner,
    F: LocalFs,
    H: HomeDir,
    P: ProgressReporter,
{
    #[must_use]
    pub fn new(store: KeyStore<'a, R, F, H>, reporter: &'a P) -> Self {
        Self { store, reporter }
    }

    #[must_use]
    pub fn store(&self) -> &KeyStore<'a, R, F, H> {
        &self.store
    }

    /// Guarantee a usable key pair and return its public key path.
    ///
    /// `capacity` bounds the returned path the way a caller-owned buffer
    /// would: the path must be strictly shorter than it.
    ///
    /// # Errors
    ///
    /// - `AuthError::Buffer` if `capacity` is zero (checked before any I/O)
    ///   or too small for the path.
    /// - Any other `AuthError` kind from the stage that failed terminally.
    pub async fn prepare(&self, capacity: usize) -> Result<PreparedKey, AuthError> {
        self.prepare_traced(capacity).await.map(|(prepared, _)| prepared)
    }

    /// [`Self::prepare`], also returning the stages visited in order.
    ///
    /// # Errors
    ///
    /// See [`Self::prepare`].
    pub async fn prepare_traced(
        &self,
        capacity: usize,
    ) -> Result<(PreparedKey, Vec<Stage>), AuthError> {
        if capacity == 0 {
            return Err(AuthError::Buffer);
        }

        let mut stage = Stage::CheckTooling;
        let mut trail = Vec::with_capacity(MAX_TRANSITIONS);
        loop {
            if trail.len() == MAX_TRANSITIONS {
                tracing::error!(?trail, "provisioning did not converge");
                return Err(AuthError::KeyGen);
            }
            trail.push(stage);
            tracing::debug!(?stage, "entering stage");
            match self.advance(stage, capacity).await {
                Ok(Transition::Next(next)) => stage = next,
                Ok(Transition::Done(prepared)) => {
                    self.reporter.success("SSH key pair ready");
                    return Ok((prepared, trail));
                }
                Err(e) => {
                    tracing::debug!(?stage, error = %e, "stage failed");
                    return Err(e);
                }
            }
        }
    }

    async fn advance(&self, stage: Stage, capacity: usize) -> Result<Transition, AuthError> {
        let store = &self.store;
        let next = match stage {
            Stage::CheckTooling => {
                self.reporter.step("checking for ssh-keygen...");
                if !store.keygen_available().await {
                    return Err(AuthError::OpensshNotFound);
                }
                Stage::EnsureDirectory
            }

            Stage::EnsureDirectory => {
                self.reporter.step("checking ~/.ssh...");
                store.ensure_ssh_directory()?;
                Stage::SelectKey
            }

            Stage::SelectKey => {
                let key = KeyType::PREFERRED;
                if store.exists(key) {
                    Stage::Recheck(key)
                } else {
                    self.reporter.step(&format!("generating {key} key pair..."));
                    match store.generate(key, false).await {
                        Ok(()) => Stage::Recheck(key),
                        Err(e) => {
                            self.reporter.warn(&format!(
                                "{key} key generation failed ({e}), trying {}",
                                key.other()
                            ));
                            Stage::GenerateFallback
                        }
                    }
                }
            }

            Stage::GenerateFallback => {
                let key = KeyType::PREFERRED.other();
                if !store.exists(key) {
                    self.reporter.step(&format!("generating {key} key pair..."));
                    store.generate(key, false).await?;
                }
                Stage::Recheck(key)
            }

            Stage::Recheck(key) => {
                if store.exists(key) {
                    Stage::ProbeIntegrity(key)
                } else if key == KeyType::PREFERRED {
                    let other = key.other();
                    self.reporter.warn(&format!(
                        "{key} key pair missing after generation, trying {other}"
                    ));
                    if !store.exists(other) {
                        store
                            .generate(other, false)
                            .await
                            .map_err(|_| AuthError::KeyGen)?;
                    }
                    Stage::ProbeIntegrity(other)
                } else {
                    return Err(AuthError::KeyGen);
                }
            }

            Stage::ProbeIntegrity(key) => {
                if store.public_key_intact(key) {
                    Stage::NormalizePermissions(key)
                } else {
                    self.reporter
                        .warn(&format!("{key} public key is unreadable, regenerating"));
                    Stage::Regenerate(key)
                }
            }

            Stage::Regenerate(key) => match store.generate(key, true).await {
                Ok(()) if store.exists(key) => Stage::NormalizePermissions(key),
                Ok(()) => {
                    tracing::debug!(%key, "regenerated pair is missing");
                    Stage::Fallback(key)
                }
                Err(e) => {
                    tracing::debug!(%key, error = %e, "forced regeneration failed");
                    Stage::Fallback(key)
                }
            },

            Stage::Fallback(failed) => {
                let other = failed.other();
                self.reporter
                    .warn(&format!("cannot regenerate {failed} key pair, using {other}"));
                if !store.exists(other) {
                    let generated = store.generate(other, false).await;
                    if !store.exists(other) {
                        return Err(generated.err().unwrap_or(AuthError::KeyGen));
                    }
                }
                Stage::NormalizePermissions(other)
            }

            Stage::NormalizePermissions(key) => {
                store.fix_permissions(key)?;
                Stage::Output(key)
            }

            Stage::Output(key) => {
                let public_key_path = store.public_key_path(key)?;
                if public_key_path.as_os_str().len() >= capacity {
                    return Err(AuthError::Buffer);
                }
                return Ok(Transition::Done(PreparedKey {
                    key_type: key,
                    public_key_path,
                }));
            }
        };
        Ok(Transition::Next(next))
    }
}
