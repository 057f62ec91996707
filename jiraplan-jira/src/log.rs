//! Ordered log of an import run

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Outcome tag of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Info,
    Ok,
    Err,
    Skip,
    Dry,
}

impl LogStatus {
    /// Upper-case tag used when printing the log
    pub fn tag(self) -> &'static str {
        match self {
            LogStatus::Info => "INFO",
            LogStatus::Ok => "OK",
            LogStatus::Err => "ERR",
            LogStatus::Skip => "SKIP",
            LogStatus::Dry => "DRY",
        }
    }
}

impl std::fmt::Display for LogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single event of an import run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub status: LogStatus,
    pub message: String,
}

/// Append-only list of log entries
///
/// Every entry is also forwarded to `tracing`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportLog {
    entries: Vec<LogEntry>,
}

impl ImportLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn push(&mut self, status: LogStatus, message: impl Into<String>) {
        let message = message.into();
        match status {
            LogStatus::Err => warn!(status = %status, "{}", message),
            LogStatus::Skip | LogStatus::Dry => debug!(status = %status, "{}", message),
            LogStatus::Info | LogStatus::Ok => info!(status = %status, "{}", message),
        }
        self.entries.push(LogEntry { status, message });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogStatus::Info, message);
    }

    pub fn ok(&mut self, message: impl Into<String>) {
        self.push(LogStatus::Ok, message);
    }

    pub fn err(&mut self, message: impl Into<String>) {
        self.push(LogStatus::Err, message);
    }

    pub fn skip(&mut self, message: impl Into<String>) {
        self.push(LogStatus::Skip, message);
    }

    pub fn dry(&mut self, message: impl Into<String>) {
        self.push(LogStatus::Dry, message);
    }

    /// All entries in the order they were logged
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of entries with the given status
    pub fn count(&self, status: LogStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    /// Number of `err` entries
    pub fn error_count(&self) -> usize {
        self.count(LogStatus::Err)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ImportLog {
    type Item = &'a LogEntry;
    type IntoIter = std::slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_keeps_order_and_counts() {
        let mut log = ImportLog::new();
        log.info("start");
        log.err("first failure");
        log.ok("created");
        log.err("second failure");
        log.skip("skipped");

        assert_eq!(log.len(), 5);
        assert_eq!(log.entries()[1].message, "first failure");
        assert_eq!(log.error_count(), 2);
        assert_eq!(log.count(LogStatus::Skip), 1);
        assert_eq!(log.count(LogStatus::Dry), 0);
    }

    #[test]
    fn test_log_serializes_as_list() {
        let mut log = ImportLog::new();
        log.dry("[Task] TASK-1: x (1SP)");
        let json = serde_json::to_string(&log).unwrap();
        assert_eq!(json, r#"[{"status":"dry","message":"[Task] TASK-1: x (1SP)"}]"#);
    }

    #[test]
    fn test_status_tag() {
        assert_eq!(LogStatus::Skip.to_string(), "SKIP");
        assert_eq!(LogStatus::Ok.tag(), "OK");
    }
}
