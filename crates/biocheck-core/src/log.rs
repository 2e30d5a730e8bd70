//! Activity log
//!
//! Every operation outcome is recorded as a timestamped line. The log is held
//! newest first and only ever grows by prepending.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Local};

/// A single immutable log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    timestamp: DateTime<Local>,
    message: String,
}

impl LogEntry {
    /// Create an entry stamped with the current local time
    pub fn new(message: impl Into<String>) -> Self {
        Self::at(Local::now(), message)
    }

    /// Create an entry with an explicit timestamp
    pub fn at(timestamp: DateTime<Local>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// Destination for operation log messages
pub trait LogSink: Send {
    /// Record one message
    fn append(&mut self, message: String);
}

/// The on-screen activity log, newest entry first
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an already-stamped entry
    pub fn push(&mut self, entry: LogEntry) {
        tracing::info!(target: "biocheck_core::log", "{}", entry.message());
        self.entries.push_front(entry);
    }

    /// Prepend buffered entries, preserving the order they were recorded in
    pub fn absorb(&mut self, pending: PendingLog) {
        for entry in pending.entries {
            self.push(entry);
        }
    }

    /// Entries, newest first
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry's message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(needle))
    }
}

impl LogSink for ActivityLog {
    fn append(&mut self, message: String) {
        self.push(LogEntry::new(message));
    }
}

/// Entries recorded away from the UI thread, in recording order
///
/// Timestamps are taken when the message is recorded, not when the buffer is
/// absorbed into an [`ActivityLog`].
#[derive(Debug, Clone, Default)]
pub struct PendingLog {
    entries: Vec<LogEntry>,
}

impl PendingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(LogEntry::message)
    }
}

impl LogSink for PendingLog {
    fn append(&mut self, message: String) {
        self.entries.push(LogEntry::new(message));
    }
}
