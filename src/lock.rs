//! Advisory lock marker.
//!
//! The lock is a file next to the log holding the owner's pid. Its presence is
//! all that matters: the pid is never read back, and a marker left by a
//! crashed run blocks later runs until it is cleaned up.

use crate::error::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// An acquired lock marker. Removed on `release`, or on drop as a fallback.
#[derive(Debug)]
pub struct LockGuard {
    path: PathBuf,
    released: bool,
}

impl LockGuard {
    /// Creates the marker if no other run holds it.
    ///
    /// Returns `Ok(None)` when the marker already exists. Creation uses
    /// exclusive create, so two runs racing for the marker cannot both win.
    pub async fn acquire<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Locking");

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "Lock found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        // From here on the guard owns the marker, so a failed pid write still
        // removes it.
        let guard = Self {
            path: path.to_path_buf(),
            released: false,
        };

        let pid = std::process::id();
        file.write_all(format!("{pid}\n").as_bytes()).await?;
        file.flush().await?;
        debug!(pid, "Wrote pid to lock file");

        Ok(Some(guard))
    }

    #[cfg(test)]
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the marker. Returns `false` if it was already gone.
    pub async fn release(mut self) -> Result<bool> {
        self.released = true;
        debug!(path = %self.path.display(), "Unlocking");

        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Lock removed on drop"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove lock"),
        }
    }
}
