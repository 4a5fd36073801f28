//! Print only what was appended to a log file since the last time it was read.
//!
//! The read position is kept in a hidden state file next to the log
//! (`.NAME.logsince`), together with the file size seen at the time. A log
//! that shrank below that size is taken to be rotated and is read from the
//! beginning again. A lock marker (`.NAME.logsince.LCK`) keeps two runs from
//! updating the same state file, and a backup (`.NAME.logsince.bak`) of the
//! state is kept until a run completes.
//!
//! # Example
//!
//! ```rust,no_run
//! use logsince::{RunConfig, run};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig::new("app.log");
//!     let mut out = tokio::io::stdout();
//!
//!     let outcome = run(&config, &mut out).await?;
//!     eprintln!("next run starts at {}", outcome.new_offset);
//!
//!     Ok(())
//! }
//! ```

// Internal modules - not part of public API
mod backup;
mod cli;
mod config;
mod error;
mod lock;
mod logging;
mod paths;
mod reader;
mod session;
mod state;

#[cfg(test)]
mod test_helpers;

// Public API exports
pub use cli::Cli;
pub use config::{Mode, RunConfig};
pub use error::{Error, Result};
pub use logging::init as init_logging;
pub use paths::StatePaths;
pub use reader::{ReadOutcome, Unit};
pub use session::{clean, execute, run};
