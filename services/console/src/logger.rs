//! File-backed event log
//!
//! Appends one human-readable line per engine event to `events.log`,
//! flushed immediately so the log survives an abrupt exit. The engine
//! treats the log as write-only and assumes it serializes its own
//! writes; the mutex here is that serialization.

use chrono::Local;
use matching_engine::events::{EventCategory, EventLog};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tracing::error;

/// Event log writing `YYYY-MM-DD HH:MM:SS [Category] message` lines
pub struct FileEventLog {
    file: Mutex<File>,
}

impl FileEventLog {
    /// Open (or create) the log file in append mode.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        let log = Self {
            file: Mutex::new(file),
        };
        log.log(EventCategory::System, "event log opened");
        Ok(log)
    }
}

impl EventLog for FileEventLog {
    fn log(&self, category: EventCategory, message: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut file = self.file.lock().unwrap();
        if let Err(e) = writeln!(file, "{stamp} [{category}] {message}").and_then(|_| file.flush())
        {
            // The event log must never take the engine down with it
            error!(error = %e, "event log write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lines_carry_category_and_message() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("events.log");

        let log = FileEventLog::open(&path).unwrap();
        log.log(EventCategory::Order, "placing BID order 1 for 5 @ 100");
        log.log(EventCategory::Error, "rejected");

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("[System] event log opened"));
        assert!(lines[1].contains("[Order] placing BID order 1 for 5 @ 100"));
        assert!(lines[2].contains("[Error] rejected"));
    }

    #[test]
    fn test_reopen_appends() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("events.log");

        {
            let log = FileEventLog::open(&path).unwrap();
            log.log(EventCategory::System, "first run");
        }
        {
            let log = FileEventLog::open(&path).unwrap();
            log.log(EventCategory::System, "second run");
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("first run"));
        assert!(contents.contains("second run"));
        assert_eq!(contents.lines().count(), 4);
    }
}
