//! Append-only run-log file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;
use courier_engine::{RunEvent, RunLog};

/// Writes one timestamped line per event, creating the file on first
/// use. The timestamp format matches the historical log files this
/// tool's operators already grep.
pub struct FileRunLog {
    path: PathBuf,
}

impl FileRunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RunLog for FileRunLog {
    fn append(&self, event: &RunEvent) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let stamp = Local::now().format("%d/%m/%Y - %H:%M:%S");
        writeln!(file, "{stamp} - {event}")
    }
}
