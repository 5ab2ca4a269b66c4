//! Filesystem infrastructure: implements the `LocalFs` port.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::LocalFs;

/// Production filesystem implementation of `LocalFs`.
pub struct HostFs {
    posix: bool,
}

impl HostFs {
    /// `posix` decides whether mode bits are honoured.
    #[must_use]
    pub fn new(posix: bool) -> Self {
        Self { posix }
    }

    /// Honour mode bits exactly on Unix hosts.
    #[must_use]
    pub fn detect() -> Self {
        Self::new(cfg!(unix))
    }
}

impl LocalFs for HostFs {
    fn supports_posix_permissions(&self) -> bool {
        self.posix
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir(&self, path: &Path, mode: u32) -> Result<()> {
        let mut builder = std::fs::DirBuilder::new();
        #[cfg(unix)]
        if self.posix {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;
        builder
            .create(path)
            .with_context(|| format!("creating directory {}", path.display()))
    }

    fn mode(&self, path: &Path) -> Result<u32> {
        let meta =
            std::fs::metadata(path).with_context(|| format!("reading metadata {}", path.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            Ok(meta.permissions().mode() & 0o777)
        }
        #[cfg(not(unix))]
        {
            Ok(if meta.permissions().readonly() { 0o444 } else { 0o666 })
        }
    }

    fn set_mode(&self, path: &Path, mode: u32) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
                .with_context(|| format!("setting mode {mode:o} on {}", path.display()))
        }
        #[cfg(not(unix))]
        {
            let _ = mode;
            std::fs::metadata(path)
                .map(|_| ())
                .with_context(|| format!("reading metadata {}", path.display()))
        }
    }

    fn read_prefix(&self, path: &Path, max: usize) -> Result<Vec<u8>> {
        let file =
            std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let mut buf = Vec::new();
        file.take(max as u64)
            .read_to_end(&mut buf)
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(buf)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path).with_context(|| format!("removing file {}", path.display()))
    }
}
