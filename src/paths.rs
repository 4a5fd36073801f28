//! Sidecar path derivation.

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Tag that marks a file as one of ours.
pub const STATE_SUFFIX: &str = "logsince";

/// The hidden files kept next to a tracked log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    /// `.name.logsince`, the watermark.
    pub state: PathBuf,
    /// `.name.logsince.LCK`, present while a run is active.
    pub lock: PathBuf,
    /// `.name.logsince.bak`, snapshot of the watermark taken before a run.
    pub backup: PathBuf,
    /// `.name.logsince.tmp`, used while replacing the watermark.
    pub staging: PathBuf,
}

impl StatePaths {
    /// Derives the sidecar paths for `target`.
    ///
    /// All paths live in the same directory as `target`. The only failure is
    /// a path with no file name component, such as `/` or `..`.
    pub fn for_target<P: AsRef<Path>>(target: P) -> Result<Self> {
        let target = target.as_ref();
        let name = target.file_name().ok_or_else(|| Error::InvalidPath {
            message: format!("no file name in '{}'", target.display()),
        })?;
        let dir = target.parent().unwrap_or_else(|| Path::new(""));

        let mut state_name = OsString::from(".");
        state_name.push(name);
        state_name.push(".");
        state_name.push(STATE_SUFFIX);

        let state = dir.join(&state_name);
        Ok(Self {
            lock: with_extension_suffix(&state, "LCK"),
            backup: with_extension_suffix(&state, "bak"),
            staging: with_extension_suffix(&state, "tmp"),
            state,
        })
    }

    /// Every sidecar path, in the order they are cleaned up.
    pub fn all(&self) -> [&Path; 4] {
        [&self.state, &self.lock, &self.backup, &self.staging]
    }
}

fn with_extension_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(".");
    raw.push(suffix);
    PathBuf::from(raw)
}
