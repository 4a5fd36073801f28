//! One invocation against one log file: lock, snapshot, read, record, unlock.

use crate::backup::BackupManager;
use crate::config::{Mode, RunConfig};
use crate::error::{Error, Result};
use crate::lock::LockGuard;
use crate::paths::StatePaths;
use crate::reader::{ReadOutcome, read_and_print, resolve_start};
use crate::state::StateStore;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tokio::io::{AsyncWrite, BufWriter};
use tracing::debug;

/// Runs `config` with stdout as the output.
pub async fn execute(config: &RunConfig) -> Result<()> {
    match config.mode {
        Mode::Clean => {
            let removed = clean(&config.target).await?;
            debug!(removed, "Cleaned up hidden files");
        }
        Mode::Run => {
            let mut stdout = BufWriter::new(tokio::io::stdout());
            run(config, &mut stdout).await?;
        }
    }
    Ok(())
}

/// Prints what was appended to the log since the last run and records the
/// new watermark.
///
/// Fails with [`Error::LockHeld`] without touching any state if another run
/// holds the lock. The lock is released on every path once acquired. The
/// backup is removed only when the run succeeds.
pub async fn run<W>(config: &RunConfig, out: &mut W) -> Result<ReadOutcome>
where
    W: AsyncWrite + Unpin,
{
    let paths = StatePaths::for_target(&config.target)?;

    let Some(lock) = LockGuard::acquire(&paths.lock).await? else {
        return Err(Error::LockHeld {
            path: config.target.clone(),
        });
    };

    let result = locked_run(config, &paths, out).await;
    let released = lock.release().await;

    let outcome = result?;
    released?;
    Ok(outcome)
}

async fn locked_run<W>(config: &RunConfig, paths: &StatePaths, out: &mut W) -> Result<ReadOutcome>
where
    W: AsyncWrite + Unpin,
{
    let store = StateStore::new(paths, config.dry_run);
    let backup = BackupManager::new(paths);

    if !store.is_dry_run() {
        backup.snapshot().await?;
    }

    let start = resolve_start(&config.target, &store, config.start, config.unit).await?;
    let outcome = read_and_print(&config.target, start, config.max_lines, config.unit, out).await?;

    if !outcome.advanced {
        debug!(offset = outcome.new_offset, "No new content, keeping position");
    }
    // The size line was just rewritten, so the offset line always goes back,
    // even when it did not move.
    store.append_offset(outcome.new_offset).await?;

    if !store.is_dry_run() {
        backup.discard().await?;
    }

    Ok(outcome)
}

/// Removes every sidecar file for `target`. Returns how many existed.
///
/// Safe to call repeatedly and while nothing exists.
pub async fn clean<P: AsRef<Path>>(target: P) -> Result<usize> {
    let paths = StatePaths::for_target(target)?;
    debug!("Cleaning up logsince hidden files");

    let mut removed = 0;
    for path in paths.all() {
        match fs::remove_file(path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Removed");
                removed += 1;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(removed)
}
