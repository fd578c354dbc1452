//! Audit trail: who did what, when, and where
//!
//! The workflow engine emits one [`AuditEntry`] per state transition into
//! an [`AuditSink`]. The sink is a passive collaborator: it never
//! influences the transition it records. [`MemoryAuditLog`] is the
//! in-process implementation; [`NoopSink`] discards everything.

#![deny(unsafe_code)]

use chrono::{DateTime, Utc};
use procura_types::Role;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use uuid::Uuid;

/// Severity of an audit event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSeverity {
    #[default]
    Info,
    Warning,
    Critical,
}

/// A single audit trail record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Acting user id
    pub user: String,
    pub role: Role,
    /// Platform module the action belongs to (e.g. `procurement`)
    pub module: String,
    /// Machine-readable action name (e.g. `approve_pr`)
    pub action: String,
    /// The entity acted upon (e.g. a document id)
    pub entity: String,
    pub description: String,
    /// Free-form structured context
    pub details: Option<serde_json::Value>,
    pub severity: AuditSeverity,
}

impl AuditEntry {
    pub fn new(
        user: impl Into<String>,
        role: Role,
        module: impl Into<String>,
        action: impl Into<String>,
        entity: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            user: user.into(),
            role,
            module: module.into(),
            action: action.into(),
            entity: entity.into(),
            description: description.into(),
            details: None,
            severity: AuditSeverity::Info,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_severity(mut self, severity: AuditSeverity) -> Self {
        self.severity = severity;
        self
    }
}

/// Consumer of audit entries.
pub trait AuditSink {
    fn record(&self, entry: AuditEntry);
}

impl<A: AuditSink + ?Sized> AuditSink for Rc<A> {
    fn record(&self, entry: AuditEntry) {
        (**self).record(entry)
    }
}

impl<A: AuditSink + ?Sized> AuditSink for &A {
    fn record(&self, entry: AuditEntry) {
        (**self).record(entry)
    }
}

/// A sink that discards every entry.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl AuditSink for NoopSink {
    fn record(&self, _entry: AuditEntry) {}
}

/// Append-only in-memory audit log with simple queries.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: RefCell<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries, newest first.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// The newest `limit` entries.
    pub fn recent(&self, limit: usize) -> Vec<AuditEntry> {
        self.entries.borrow().iter().take(limit).cloned().collect()
    }

    pub fn by_entity(&self, entity: &str) -> Vec<AuditEntry> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.entity == entity)
            .cloned()
            .collect()
    }

    pub fn by_module(&self, module: &str) -> Vec<AuditEntry> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.module == module)
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over description, user, entity
    /// and module.
    pub fn search(&self, query: &str) -> Vec<AuditEntry> {
        let q = query.to_lowercase();
        self.entries
            .borrow()
            .iter()
            .filter(|e| {
                e.description.to_lowercase().contains(&q)
                    || e.user.to_lowercase().contains(&q)
                    || e.entity.to_lowercase().contains(&q)
                    || e.module.to_lowercase().contains(&q)
            })
            .cloned()
            .collect()
    }

    /// Aggregate counters over the whole log.
    pub fn stats(&self) -> AuditStats {
        let entries = self.entries.borrow();
        let users: HashSet<&str> = entries.iter().map(|e| e.user.as_str()).collect();
        AuditStats {
            total: entries.len(),
            critical: entries
                .iter()
                .filter(|e| e.severity == AuditSeverity::Critical)
                .count(),
            warnings: entries
                .iter()
                .filter(|e| e.severity == AuditSeverity::Warning)
                .count(),
            unique_users: users.len(),
        }
    }
}

impl AuditSink for MemoryAuditLog {
    fn record(&self, entry: AuditEntry) {
        // Newest first, matching read order
        self.entries.borrow_mut().insert(0, entry);
    }
}

/// Aggregate audit log counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStats {
    pub total: usize,
    pub critical: usize,
    pub warnings: usize,
    pub unique_users: usize,
}
