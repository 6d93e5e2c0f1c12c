//! Document-backed implementation of `AuditSink`.
//!
//! `DocumentAuditLog` stores the whole audit trail as one `AuditDocument`
//! under the `audit-logs` key of any `DocumentStore`. Each `record` is a
//! read-modify-write cycle:
//!
//!   load log → prepend new entry → truncate to capacity → persist
//!
//! so the stored sequence is always newest-first and never longer than
//! `capacity`. The oldest entries fall off the end.
//!
//! Recording never fails the caller. A log that cannot be read is left
//! alone (the event is dropped) rather than overwritten with a single
//! entry, and a failed write is only logged.

use std::sync::Arc;

use tracing::{debug, error, warn};

use appdesk_contracts::{
    audit::{AuditEntry, AuditEvent, DEFAULT_AUDIT_CAPACITY},
    document::AuditDocument,
};
use appdesk_core::{
    document::{load, persist},
    traits::{AuditSink, DocumentStore},
};

pub struct DocumentAuditLog {
    store: Arc<dyn DocumentStore>,
    capacity: usize,
}

impl DocumentAuditLog {
    /// An audit log on `store` retaining `DEFAULT_AUDIT_CAPACITY` entries.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_capacity(store, DEFAULT_AUDIT_CAPACITY)
    }

    /// An audit log retaining at most `capacity` entries (minimum 1).
    pub fn with_capacity(store: Arc<dyn DocumentStore>, capacity: usize) -> Self {
        Self {
            store,
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl AuditSink for DocumentAuditLog {
    fn record(&self, event: AuditEvent) {
        let mut snapshot = load::<AuditDocument>(self.store.as_ref());
        if !snapshot.is_writable() {
            warn!(
                action = %event.action,
                target_id = ?event.target_id,
                "audit log unreadable; dropping audit event"
            );
            return;
        }

        let entry = event.into_entry();
        let entry_id = entry.id.clone();
        let logs = &mut snapshot.doc.logs;
        logs.insert(0, entry);
        if logs.len() > self.capacity {
            debug!(evicted = logs.len() - self.capacity, "audit log at capacity");
            logs.truncate(self.capacity);
        }

        if let Err(e) = persist(self.store.as_ref(), &snapshot.doc) {
            error!(entry_id = %entry_id, error = %e, "failed to log audit event");
        }
    }

    fn list(&self, limit: usize) -> Vec<AuditEntry> {
        let mut logs = load::<AuditDocument>(self.store.as_ref()).doc.logs;
        logs.truncate(limit);
        logs
    }
}
