use crate::error::{SanctionError, SanctionResult};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Append-only record of what a moderator did during a run.
/// Free text for humans; nothing parses it back.
pub trait ActionLog {
    fn record(&self, message: &str) -> SanctionResult<()>;
}

/// Appends `<timestamp> - <message>` lines to a file
pub struct FileActionLog {
    path: PathBuf,
}

impl FileActionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ActionLog for FileActionLog {
    fn record(&self, message: &str) -> SanctionResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| SanctionError::io(&self.path, e))?;
        writeln!(file, "{}", format_entry(&Local::now().format(TIMESTAMP_FORMAT).to_string(), message))
            .map_err(|e| SanctionError::io(&self.path, e))
    }
}

/// Action log that drops everything
pub struct NoOpActionLog;

impl Default for NoOpActionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl NoOpActionLog {
    pub fn new() -> Self {
        Self
    }
}

impl ActionLog for NoOpActionLog {
    fn record(&self, _message: &str) -> SanctionResult<()> {
        Ok(()) // No-op
    }
}

fn format_entry(timestamp: &str, message: &str) -> String {
    format!("{timestamp} - {message}")
}
