//! Audit trail of ledger mutations
//!
//! Sinks are fire-and-forget: a failing sink never fails the operation it records.

use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    pub timestamp: DateTime<Local>,
    pub action: String,
    pub resource: String,
    pub success: bool,
}

impl AuditEvent {
    pub fn new(action: impl Into<String>, resource: impl Into<String>, success: bool) -> Self {
        Self {
            timestamp: Local::now(),
            action: action.into(),
            resource: resource.into(),
            success,
        }
    }

    /// `[RFC3339] Action: .. Resource: .. Success: ..`
    pub fn to_line(&self) -> String {
        format!(
            "[{}] Action: {} Resource: {} Success: {}",
            self.timestamp.to_rfc3339(),
            self.action,
            self.resource,
            self.success
        )
    }
}

pub trait AuditSink: Send + Sync {
    fn record(&self, event: &AuditEvent);
}

/// Writes audit events to the `arthik::audit` log target
#[derive(Debug, Default)]
pub struct LogAuditSink;

impl AuditSink for LogAuditSink {
    fn record(&self, event: &AuditEvent) {
        log::info!(target: "arthik::audit", "{}", event.to_line());
    }
}

/// Appends one line per event to a file
#[derive(Debug)]
pub struct FileAuditSink {
    path: PathBuf,
}

impl FileAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", line)
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &AuditEvent) {
        if let Err(e) = self.append(&event.to_line()) {
            log::warn!(target: "arthik::audit", "Failed to write audit log {}: {}", self.path.display(), e);
        }
    }
}

/// Keeps events in memory
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: &AuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
