//! Event log interface consumed by the engine
//!
//! The event log is a capability handed to the engine by whoever owns
//! it; the engine only writes `(category, message)` pairs at the
//! defined lifecycle points and assumes the sink serializes its own
//! writes. The file-backed implementation lives with the console front
//! end; `MemoryEventLog` here backs tests.

use std::fmt;
use std::sync::Mutex;

/// Event categories emitted by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    /// Construction, teardown, replay
    System,
    /// Submissions, cancels, full fills
    Order,
    /// Each trade struck
    Trade,
    /// Rejected operations
    Error,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::System => "System",
            EventCategory::Order => "Order",
            EventCategory::Trade => "Trade",
            EventCategory::Error => "Error",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Write-only event sink
pub trait EventLog: Send + Sync {
    fn log(&self, category: EventCategory, message: &str);
}

/// Event log that drops everything
pub struct NullEventLog;

impl EventLog for NullEventLog {
    fn log(&self, _category: EventCategory, _message: &str) {}
}

/// In-memory event log for tests
#[derive(Default)]
pub struct MemoryEventLog {
    entries: Mutex<Vec<(EventCategory, String)>>,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far
    pub fn entries(&self) -> Vec<(EventCategory, String)> {
        self.entries.lock().unwrap().clone()
    }

    /// Count of entries in one category
    pub fn count(&self, category: EventCategory) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == category)
            .count()
    }
}

impl EventLog for MemoryEventLog {
    fn log(&self, category: EventCategory, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((category, message.to_string()));
    }
}
