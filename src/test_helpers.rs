//! Test utilities for creating temporary log files and inspecting their sidecars.

#[cfg(test)]
use crate::paths::StatePaths;
#[cfg(test)]
use std::fs::{File, OpenOptions};
#[cfg(test)]
use std::io::Write;
#[cfg(test)]
use std::path::{Path, PathBuf};

#[cfg(test)]
pub struct TempLogFile {
    pub path: PathBuf,
    pub paths: StatePaths,
    _temp_dir: tempfile::TempDir,
}

#[cfg(test)]
impl TempLogFile {
    /// Create a new, empty temporary log file for testing
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("test.log");

        File::create(&path)?;

        let paths = StatePaths::for_target(&path).map_err(std::io::Error::other)?;
        Ok(Self {
            path,
            paths,
            _temp_dir: temp_dir,
        })
    }

    /// Create a temporary log file with initial content, written verbatim
    pub fn with_content(content: &str) -> std::io::Result<Self> {
        let temp_file = Self::new()?;
        temp_file.append(content)?;
        Ok(temp_file)
    }

    /// Append raw content to the log file
    pub fn append(&self, content: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Truncate the file (simulate log rotation)
    pub fn truncate(&self) -> std::io::Result<()> {
        File::create(&self.path)?;
        Ok(())
    }

    /// Overwrite the state file with arbitrary content
    pub fn write_state(&self, content: &str) -> std::io::Result<()> {
        std::fs::write(&self.paths.state, content)
    }

    /// Current state file content, if any
    pub fn state_content(&self) -> Option<String> {
        std::fs::read_to_string(&self.paths.state).ok()
    }

    /// Get the path to the temporary file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the log file and its sidecars
    pub fn dir(&self) -> &Path {
        self._temp_dir.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_log_file_creation() {
        let temp_file = TempLogFile::new().unwrap();
        assert!(temp_file.path().exists());
        assert_eq!(temp_file.paths.state.parent(), Some(temp_file.dir()));
    }

    #[test]
    fn test_with_content_is_verbatim() {
        let temp_file = TempLogFile::with_content("a\nb").unwrap();

        let file_content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(file_content, "a\nb");
    }

    #[test]
    fn test_append() {
        let temp_file = TempLogFile::new().unwrap();
        temp_file.append("line 1\n").unwrap();
        temp_file.append("line 2\n").unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(content, "line 1\nline 2\n");
    }

    #[test]
    fn test_truncate() {
        let temp_file = TempLogFile::with_content("initial content\n").unwrap();
        temp_file.truncate().unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.is_empty());
    }

    #[test]
    fn test_state_roundtrip() {
        let temp_file = TempLogFile::new().unwrap();
        assert_eq!(temp_file.state_content(), None);

        temp_file.write_state("10\n4\n").unwrap();
        assert_eq!(temp_file.state_content().as_deref(), Some("10\n4\n"));
    }
}
