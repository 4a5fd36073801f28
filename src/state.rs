//! Watermark persistence.
//!
//! The state file holds two newline-terminated decimal integers: the size of
//! the log file when it was last seen, and the offset reading stopped at.
//! Damaged content never fails a run; it degrades to "start from the
//! beginning".

use crate::error::Result;
use crate::paths::StatePaths;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// The persisted (size, offset) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Watermark {
    /// Log file size recorded on the last run. Malformed content reads as 0.
    pub size: u64,
    /// Where the last run stopped. `None` if missing or malformed.
    pub offset: Option<u64>,
}

impl Watermark {
    /// Parses state file content, tolerating damage on either line.
    pub fn parse(raw: &[u8]) -> Self {
        let text = String::from_utf8_lossy(raw);
        let mut lines = text.lines();

        let size = match parse_field(lines.next()) {
            Some(size) => size,
            None => {
                debug!("Recorded size is not an integer, using 0");
                0
            }
        };
        let offset = parse_field(lines.next());
        if offset.is_none() {
            debug!("Recorded offset is missing or not an integer");
        }

        Self { size, offset }
    }
}

fn parse_field(line: Option<&str>) -> Option<u64> {
    line.and_then(|line| line.trim().parse().ok())
}

/// Reads and writes the state file for one log file.
#[derive(Debug, Clone)]
pub struct StateStore {
    state: PathBuf,
    staging: PathBuf,
    dry_run: bool,
}

impl StateStore {
    /// Creates a store. With `dry_run` set, every write is skipped.
    pub fn new(paths: &StatePaths, dry_run: bool) -> Self {
        Self {
            state: paths.state.clone(),
            staging: paths.staging.clone(),
            dry_run,
        }
    }

    pub fn path(&self) -> &Path {
        &self.state
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Reads the watermark. `None` means no prior state exists.
    pub async fn read(&self) -> Result<Option<Watermark>> {
        match fs::read(&self.state).await {
            Ok(raw) => {
                let watermark = Watermark::parse(&raw);
                debug!(path = %self.state.display(), ?watermark, "Read state");
                Ok(Some(watermark))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.state.display(), "No state file");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces the state file with just the size line.
    ///
    /// The new content goes to the staging file first and is renamed into
    /// place, so the old inode (and any hard-linked backup of it) is left
    /// untouched.
    pub async fn write_size(&self, size: u64) -> Result<()> {
        if self.dry_run {
            debug!(size, "Test mode, not writing size");
            return Ok(());
        }

        let mut staging = File::create(&self.staging).await?;
        staging.write_all(format!("{size}\n").as_bytes()).await?;
        staging.sync_all().await?;
        drop(staging);

        fs::rename(&self.staging, &self.state).await?;
        debug!(path = %self.state.display(), size, "Recorded size");
        Ok(())
    }

    /// Appends the offset line after the size line.
    pub async fn append_offset(&self, offset: u64) -> Result<()> {
        if self.dry_run {
            debug!(offset, "Test mode, not writing offset");
            return Ok(());
        }

        let mut file = OpenOptions::new().append(true).open(&self.state).await?;
        file.write_all(format!("{offset}\n").as_bytes()).await?;
        file.sync_all().await?;
        debug!(path = %self.state.display(), offset, "Recorded offset");
        Ok(())
    }
}
