//! In-app activity log shown in the Activity tab.
//!
//! This is separate from the tracing file log: the buffer holds the
//! user-facing event history (logins, store changes, search results) in a
//! bounded queue the UI can render directly.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Keep the most recent 500 entries. Enough history to scroll back
/// through a session without unbounded growth.
const MAX_LOG_ENTRIES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn time_display(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

#[derive(Default)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    pub fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        if self.entries.len() >= MAX_LOG_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Error, message);
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_read_back() {
        let mut log = LogBuffer::new();
        log.info("started");
        log.warn("something odd");

        let entries: Vec<_> = log.entries().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "started");
        assert_eq!(entries[0].level, LogLevel::Info);
        assert_eq!(entries[1].level, LogLevel::Warn);
    }

    #[test]
    fn test_oldest_evicted_at_capacity() {
        let mut log = LogBuffer::new();
        for i in 0..MAX_LOG_ENTRIES + 10 {
            log.info(format!("entry {}", i));
        }

        assert_eq!(log.len(), MAX_LOG_ENTRIES);
        let first = log.entries().next().unwrap();
        assert_eq!(first.message, "entry 10");
    }
}
