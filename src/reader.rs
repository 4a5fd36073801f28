//! Incremental reading of a log file from a persisted watermark.

use crate::error::Result;
use crate::state::StateStore;
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncSeekExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

/// What offsets count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    /// Byte offsets from the start of the file.
    #[default]
    Bytes,
    /// 1-based line numbers.
    Lines,
}

impl Unit {
    /// Where reading starts without usable state.
    pub fn default_start(self) -> u64 {
        match self {
            Unit::Bytes => 0,
            Unit::Lines => 1,
        }
    }
}

/// Result of one read pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOutcome {
    /// Whether anything was emitted.
    pub advanced: bool,
    /// Where the next run should start. Equal to the start when not advanced.
    pub new_offset: u64,
    /// Number of lines emitted.
    pub lines: usize,
}

/// Works out where this run starts reading and refreshes the recorded size.
///
/// An explicit `start` wins over stored state. Without state, or when the
/// file shrank below the recorded size, reading starts from the beginning.
pub async fn resolve_start(
    target: &Path,
    store: &StateStore,
    start: Option<u64>,
    unit: Unit,
) -> Result<u64> {
    let current_size = fs::metadata(target).await?.len();
    let default_start = unit.default_start();

    if let Some(start) = start {
        debug!(start, "Start set, ignoring stored offset");
        store.write_size(current_size).await?;
        return Ok(start);
    }

    debug!(path = %store.path().display(), "Checking last position");
    let Some(watermark) = store.read().await? else {
        debug!("No previous position, starting from the beginning");
        store.write_size(current_size).await?;
        return Ok(default_start);
    };

    store.write_size(current_size).await?;

    if detect_file_truncation(current_size, watermark.size) {
        info!(
            current_size,
            recorded_size = watermark.size,
            "File is smaller than last time, starting from the beginning"
        );
        return Ok(default_start);
    }

    let start = watermark.offset.unwrap_or(default_start);
    if unit == Unit::Bytes && offset_beyond_end(start, current_size) {
        warn!(
            start,
            current_size, "Recorded offset is past the end of the file, starting from the beginning"
        );
        return Ok(default_start);
    }

    debug!(start, "Starting at recorded position");
    Ok(start)
}

/// Copies whole lines from `start` to `out`, up to `max_lines` if given.
///
/// Lines are written byte for byte, terminators included. A trailing line
/// with no newline is written as it is in byte units; in line units it is
/// held back until it is complete.
pub async fn read_and_print<W>(
    target: &Path,
    start: u64,
    max_lines: Option<usize>,
    unit: Unit,
    out: &mut W,
) -> Result<ReadOutcome>
where
    W: AsyncWrite + Unpin,
{
    let mut file = File::open(target).await?;
    if unit == Unit::Bytes {
        file.seek(SeekFrom::Start(start)).await?;
    }
    let mut reader = BufReader::new(file);
    if unit == Unit::Lines {
        let wanted = start.saturating_sub(1);
        let skipped = skip_lines(&mut reader, wanted).await?;
        if skipped < wanted {
            debug!(skipped, wanted, "File has fewer lines than the start line");
        }
    }

    let mut line = Vec::new();
    let mut lines = 0usize;
    let mut bytes_read = 0u64;
    loop {
        if length_reached(lines, max_lines) {
            debug!(lines, "Length reached, stopping");
            break;
        }

        line.clear();
        let n = reader.read_until(b'\n', &mut line).await?;
        if n == 0 {
            break;
        }
        // A line count cannot resume inside a line, so an unfinished last
        // line waits for the next run.
        if unit == Unit::Lines && !line.ends_with(b"\n") {
            debug!("Last line is incomplete, leaving it for the next run");
            break;
        }

        out.write_all(&line).await?;
        lines += 1;
        bytes_read += n as u64;
    }
    out.flush().await?;

    debug!(lines, bytes_read, "Read pass finished");
    Ok(ReadOutcome {
        advanced: lines > 0,
        new_offset: next_offset(start, unit, bytes_read, lines),
        lines,
    })
}

async fn skip_lines<R>(reader: &mut R, count: u64) -> Result<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut skipped = 0;
    while skipped < count {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        skipped += 1;
    }
    Ok(skipped)
}

/// Detect if the file was rotated or truncated since the size was recorded
fn detect_file_truncation(current_size: u64, recorded_size: u64) -> bool {
    current_size < recorded_size
}

fn offset_beyond_end(offset: u64, current_size: u64) -> bool {
    offset > current_size
}

fn length_reached(lines: usize, max_lines: Option<usize>) -> bool {
    max_lines.is_some_and(|max| lines >= max)
}

/// Offset to persist after emitting `bytes_read` bytes in `lines` lines
fn next_offset(start: u64, unit: Unit, bytes_read: u64, lines: usize) -> u64 {
    if lines == 0 {
        return start;
    }
    match unit {
        Unit::Bytes => start + bytes_read,
        Unit::Lines => start.max(1) + lines as u64,
    }
}
