//! Structured runtime logger contract.
//!
//! Log calls are fire-and-forget: implementations swallow their own failures so a broken log sink
//! never changes startup behavior.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::time::unix_time_ms_now;

/// Severity of a [`LogEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Expected lifecycle information.
    Info,
    /// Expected degradation, for example a `204` from the backend.
    Warning,
    /// Unexpected failure that was recovered from.
    Error,
}

impl LogLevel {
    /// Stable lowercase label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Exception detail attached to an error entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogException {
    /// Human readable failure message.
    pub message: String,
}

/// One structured log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Severity, set by the logger method the entry is passed to.
    pub level: LogLevel,
    /// Log message.
    pub message: String,
    /// Location the entry relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<i64>,
    /// Free numeric context, usually a tapp id or HTTP status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_number: Option<i64>,
    /// Person id of the signed-in user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,
    /// Source unit that emitted the entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Operation inside the source unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Failure detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ex: Option<LogException>,
    /// Creation time in unix milliseconds.
    pub timestamp_ms: u64,
}

impl LogEntry {
    /// Creates an info-level entry; the level is overwritten by the logger method used.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Info,
            message: message.into(),
            location_id: None,
            custom_number: None,
            person_id: None,
            file_name: None,
            section: None,
            ex: None,
            timestamp_ms: unix_time_ms_now(),
        }
    }

    /// Attaches a location id.
    pub fn location_id(mut self, location_id: i64) -> Self {
        self.location_id = Some(location_id);
        self
    }

    /// Attaches a custom number.
    pub fn custom_number(mut self, value: i64) -> Self {
        self.custom_number = Some(value);
        self
    }

    /// Attaches a person id.
    pub fn person_id(mut self, person_id: impl Into<String>) -> Self {
        self.person_id = Some(person_id.into());
        self
    }

    /// Attaches the emitting file and section.
    pub fn source(mut self, file_name: impl Into<String>, section: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self.section = Some(section.into());
        self
    }

    /// Attaches failure detail.
    pub fn exception(mut self, message: impl Into<String>) -> Self {
        self.ex = Some(LogException {
            message: message.into(),
        });
        self
    }
}

/// Host sink for structured runtime log entries.
pub trait RuntimeLogger {
    /// Records an entry at `level`.
    fn log(&self, level: LogLevel, entry: LogEntry);

    /// Records an info entry.
    fn info(&self, entry: LogEntry) {
        self.log(LogLevel::Info, entry);
    }

    /// Records a warning entry.
    fn warning(&self, entry: LogEntry) {
        self.log(LogLevel::Warning, entry);
    }

    /// Records an error entry.
    fn error(&self, entry: LogEntry) {
        self.log(LogLevel::Error, entry);
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Logger that drops every entry.
pub struct NoopRuntimeLogger;

impl RuntimeLogger for NoopRuntimeLogger {
    fn log(&self, _level: LogLevel, _entry: LogEntry) {}
}

#[derive(Debug, Clone, Default)]
/// Logger that keeps entries in memory for inspection.
pub struct MemoryRuntimeLogger {
    entries: Rc<RefCell<Vec<LogEntry>>>,
}

impl MemoryRuntimeLogger {
    /// Returns every recorded entry.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    /// Returns the recorded entries at `level`.
    pub fn entries_at(&self, level: LogLevel) -> Vec<LogEntry> {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.level == level)
            .cloned()
            .collect()
    }

    /// Returns whether any entry at `level` has exactly `message`.
    pub fn contains(&self, level: LogLevel, message: &str) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|entry| entry.level == level && entry.message == message)
    }
}

impl RuntimeLogger for MemoryRuntimeLogger {
    fn log(&self, level: LogLevel, mut entry: LogEntry) {
        entry.level = level;
        self.entries.borrow_mut().push(entry);
    }
}
