//! Error types for logsince.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for logsince operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors when reading the log or touching the sidecar files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Another run holds the lock marker for this log file.
    #[error("Cannot create lock for {}", path.display())]
    LockHeld { path: PathBuf },

    /// No log file was given on the command line.
    #[error("missing logfile")]
    MissingLogfile,

    /// The log file path cannot be turned into sidecar paths.
    #[error("Invalid file path: {message}")]
    InvalidPath { message: String },

    /// The state file is not something that can be backed up.
    #[error("Not a regular file: {}", path.display())]
    NotRegularFile { path: PathBuf },
}

impl Error {
    /// Process exit status for this error.
    ///
    /// User and contention errors exit with 1, anything unexpected with 2.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::LockHeld { .. } | Error::MissingLogfile | Error::InvalidPath { .. } => 1,
            Error::Io(_) | Error::NotRegularFile { .. } => 2,
        }
    }
}

/// A convenient Result type for logsince operations.
pub type Result<T> = std::result::Result<T, Error>;
