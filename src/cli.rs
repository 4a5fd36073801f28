//! Command-line arguments.

use crate::config::{Mode, RunConfig};
use crate::error::{Error, Result};
use crate::reader::Unit;
use clap::Parser;
use std::path::PathBuf;

/// Print a log file from the last line printed.
///
/// Keeps hidden .NAME.logsince and .NAME.logsince.LCK files next to the log.
#[derive(Parser, Debug)]
#[command(name = "logsince")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Use start instead of last position, in bytes (a 1-based line number with --by-line)
    #[arg(long, value_name = "N")]
    pub start: Option<u64>,

    /// Number of lines to read, defaults to end of file
    #[arg(long, value_name = "N")]
    pub length: Option<usize>,

    /// Clean up hidden files
    #[arg(long)]
    pub clean: bool,

    /// Turn debug output on
    #[arg(long)]
    pub debug: bool,

    /// Do not write to the .logsince file, only read from it
    #[arg(long)]
    pub test: bool,

    /// Track positions as line numbers instead of byte offsets
    #[arg(long)]
    pub by_line: bool,

    /// Logfile to process
    pub logfile: Option<PathBuf>,
}

impl Cli {
    /// Builds the run configuration. Fails if no log file was given.
    pub fn into_config(self) -> Result<RunConfig> {
        let target = self
            .logfile
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(Error::MissingLogfile)?;

        Ok(RunConfig {
            target,
            start: self.start,
            max_lines: self.length,
            unit: if self.by_line { Unit::Lines } else { Unit::Bytes },
            dry_run: self.test,
            debug: self.debug,
            mode: if self.clean { Mode::Clean } else { Mode::Run },
        })
    }
}
