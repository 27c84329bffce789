//! Activity log shared by the library, the CLI and the HTTP server.
//!
//! Every entry is printed to stderr and broadcast to SSE subscribers of
//! `GET /api/logs`. Storage failures in load paths, wishlist changes, wizard
//! submissions and session transitions all go through here.

use chrono::Utc;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Entries buffered per subscriber before slow clients start lagging.
const CHANNEL_CAPACITY: usize = 100;

/// Severity of an activity entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single activity entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    /// Subsystem that produced the entry (`storage`, `wishlist`, `draft`, ...).
    pub scope: String,
    pub message: String,
    /// RFC 3339 timestamp.
    pub at: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, scope: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            scope: scope.into(),
            message: message.into(),
            at: Utc::now().to_rfc3339(),
        }
    }
}

/// Global activity broadcaster
pub static ACTIVITY: Lazy<ActivityLog> = Lazy::new(ActivityLog::new);

/// Fans activity entries out to every connected SSE client.
pub struct ActivityLog {
    sender: broadcast::Sender<LogEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Print `entry` and broadcast it.
    pub fn record(&self, entry: LogEntry) {
        let marker = match entry.level {
            LogLevel::Info => " ",
            LogLevel::Success => "✓",
            LogLevel::Warning => "!",
            LogLevel::Error => "✗",
        };
        eprintln!("{} [{}] {}", marker, entry.scope, entry.message);

        // No subscribers is fine
        let _ = self.sender.send(entry);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

pub fn log_info(scope: &str, msg: impl Into<String>) {
    ACTIVITY.record(LogEntry::new(LogLevel::Info, scope, msg));
}

pub fn log_success(scope: &str, msg: impl Into<String>) {
    ACTIVITY.record(LogEntry::new(LogLevel::Success, scope, msg));
}

pub fn log_warning(scope: &str, msg: impl Into<String>) {
    ACTIVITY.record(LogEntry::new(LogLevel::Warning, scope, msg));
}

pub fn log_error(scope: &str, msg: impl Into<String>) {
    ACTIVITY.record(LogEntry::new(LogLevel::Error, scope, msg));
}
