//! Status reporting and the session log buffer
//!
//! Session managers emit [`StatusEvent`]s over an unbounded channel; the
//! sink (a popup, a terminal, a test) is a pure observer with no control
//! influence. [`LogBuffer`] keeps a short, bounded history for display:
//! the 20 most recent entries, newest first.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::protocol::constants::{MAX_LOG_ENTRIES, MAX_LOG_MESSAGE_LEN};

/// Severity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Info,
    Debug,
}

/// One entry in the session log
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl LogEntry {
    /// Create an entry stamped with the current time. Messages longer than
    /// 80 characters are truncated.
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.chars().count() > MAX_LOG_MESSAGE_LEN {
            message = message
                .chars()
                .take(MAX_LOG_MESSAGE_LEN - 3)
                .collect::<String>()
                + "...";
        }

        Self {
            level,
            timestamp: Local::now(),
            message,
        }
    }

    /// Wall-clock time of the entry, formatted `HH:MM:SS`
    pub fn time(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Capped ring buffer of recent log entries, newest first
#[derive(Debug, Default)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    debug_enabled: bool,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record debug-level entries from now on (or stop doing so)
    pub fn set_debug(&mut self, enabled: bool) {
        self.debug_enabled = enabled;
    }

    /// Insert an entry at the front, dropping the oldest beyond the cap.
    /// Debug entries are discarded while debug logging is off.
    pub fn push(&mut self, entry: LogEntry) {
        if entry.level == LogLevel::Debug && !self.debug_enabled {
            return;
        }

        self.entries.push_front(entry);
        self.entries.truncate(MAX_LOG_ENTRIES);
    }

    /// Entries newest first
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Events emitted by a session manager to its status sink
#[derive(Debug, Clone)]
pub enum StatusEvent {
    /// The connection status line changed
    Status { message: String, online: bool },
    /// A log entry was recorded
    Log(LogEntry),
}
