//! Snapshot of the state file taken before a run changes it.
//!
//! The snapshot is only evidence for manual recovery; nothing reads it back.

use crate::error::{Error, Result};
use crate::paths::StatePaths;
use std::fs::Metadata;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct BackupManager {
    source: PathBuf,
    backup: PathBuf,
}

impl BackupManager {
    pub fn new(paths: &StatePaths) -> Self {
        Self {
            source: paths.state.clone(),
            backup: paths.backup.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn backup_path(&self) -> &Path {
        &self.backup
    }

    /// Copies the state file to the backup path.
    ///
    /// Tries a hard link first and falls back to a synced content copy.
    /// Returns `false` when there is no state file yet.
    pub async fn snapshot(&self) -> Result<bool> {
        let source_meta = match metadata(&self.source).await? {
            Some(meta) => meta,
            None => return Ok(false),
        };
        if !source_meta.is_file() {
            return Err(Error::NotRegularFile {
                path: self.source.clone(),
            });
        }

        if let Some(backup_meta) = metadata(&self.backup).await? {
            if !backup_meta.is_file() {
                return Err(Error::NotRegularFile {
                    path: self.backup.clone(),
                });
            }
            if same_file(&source_meta, &backup_meta) {
                debug!(path = %self.backup.display(), "Backup already current");
                return Ok(true);
            }
        }

        debug!(path = %self.source.display(), "Backing up");
        match fs::hard_link(&self.source, &self.backup).await {
            Ok(()) => {
                debug!(path = %self.backup.display(), "Backup linked");
            }
            Err(e) => {
                debug!(error = %e, "Hard link failed, copying contents");
                copy_contents(&self.source, &self.backup).await?;
            }
        }
        Ok(true)
    }

    /// Removes the backup. Returns `false` if there was none.
    pub async fn discard(&self) -> Result<bool> {
        match fs::remove_file(&self.backup).await {
            Ok(()) => {
                debug!(path = %self.backup.display(), "Cleaned backup");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

async fn metadata(path: &Path) -> Result<Option<Metadata>> {
    match fs::metadata(path).await {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
fn same_file(a: &Metadata, b: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn same_file(_a: &Metadata, _b: &Metadata) -> bool {
    false
}

/// Replaces `dst` with the contents of `src` and syncs it to disk.
async fn copy_contents(src: &Path, dst: &Path) -> Result<()> {
    let mut input = File::open(src).await?;
    let mut output = File::create(dst).await?;
    tokio::io::copy(&mut input, &mut output).await?;
    output.sync_all().await?;
    Ok(())
}
