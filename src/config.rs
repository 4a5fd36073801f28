//! Run configuration, built once from the command line.

use crate::reader::Unit;
use std::path::PathBuf;

/// What a run does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Print new content and advance the watermark.
    #[default]
    Run,
    /// Remove the sidecar files and exit.
    Clean,
}

/// Everything one invocation needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// The log file to read.
    pub target: PathBuf,
    /// Explicit start offset, overriding stored state.
    pub start: Option<u64>,
    /// Maximum lines to print. `None` reads to the end of the file.
    pub max_lines: Option<usize>,
    pub unit: Unit,
    /// Read normally but never write the state file.
    pub dry_run: bool,
    pub debug: bool,
    pub mode: Mode,
}

impl RunConfig {
    /// A plain run over `target` with every option at its default.
    pub fn new<P: Into<PathBuf>>(target: P) -> Self {
        Self {
            target: target.into(),
            start: None,
            max_lines: None,
            unit: Unit::default(),
            dry_run: false,
            debug: false,
            mode: Mode::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::new("/var/log/app.log");

        assert_eq!(config.target, PathBuf::from("/var/log/app.log"));
        assert_eq!(config.start, None);
        assert_eq!(config.max_lines, None);
        assert_eq!(config.unit, Unit::Bytes);
        assert!(!config.dry_run);
        assert!(!config.debug);
        assert_eq!(config.mode, Mode::Run);
    }
}
