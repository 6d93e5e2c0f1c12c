//! Test doubles shared by the unit tests in this crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde_json::Value;

use appdesk_contracts::{
    audit::{AuditEntry, AuditEvent},
    document::DocumentKey,
    error::{StoreError, StoreResult},
};

use crate::traits::{AuditSink, DocumentStore};

/// How a `MapStore` should misbehave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Healthy,
    Unconfigured,
    Unreachable,
    RejectWrites,
}

pub struct MapStore {
    docs: Mutex<HashMap<DocumentKey, Value>>,
    fault: Fault,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

impl MapStore {
    pub fn new() -> Self {
        Self::with_fault(Fault::Healthy)
    }

    pub fn with_fault(fault: Fault) -> Self {
        Self {
            docs: Mutex::new(HashMap::new()),
            fault,
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn seed(&self, key: DocumentKey, value: Value) {
        self.docs.lock().unwrap().insert(key, value);
    }

    pub fn raw(&self, key: DocumentKey) -> Option<Value> {
        self.docs.lock().unwrap().get(&key).cloned()
    }

    pub fn accesses(&self) -> usize {
        self.reads.load(Ordering::SeqCst) + self.writes.load(Ordering::SeqCst)
    }
}

impl DocumentStore for MapStore {
    fn backend(&self) -> &'static str {
        "map"
    }

    fn get(&self, key: DocumentKey) -> StoreResult<Option<Value>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        match self.fault {
            Fault::Unconfigured => Err(StoreError::NotConfigured { backend: "map" }),
            Fault::Unreachable => Err(StoreError::Unavailable {
                backend: "map",
                reason: "connection refused".to_string(),
            }),
            _ => Ok(self.docs.lock().unwrap().get(&key).cloned()),
        }
    }

    fn set(&self, key: DocumentKey, value: &Value) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        match self.fault {
            Fault::Unconfigured => Err(StoreError::NotConfigured { backend: "map" }),
            Fault::Unreachable => Err(StoreError::Unavailable {
                backend: "map",
                reason: "connection refused".to_string(),
            }),
            Fault::RejectWrites => Err(StoreError::Persistence {
                key: key.to_string(),
                reason: "read-only".to_string(),
            }),
            Fault::Healthy => {
                self.docs.lock().unwrap().insert(key, value.clone());
                Ok(())
            }
        }
    }
}

/// Keeps every recorded event in memory, newest first.
#[derive(Default)]
pub struct RecordingSink {
    pub entries: Mutex<Vec<AuditEntry>>,
}

impl RecordingSink {
    pub fn actions(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.action.clone())
            .collect()
    }
}

impl AuditSink for RecordingSink {
    fn record(&self, event: AuditEvent) {
        self.entries.lock().unwrap().insert(0, event.into_entry());
    }

    fn list(&self, limit: usize) -> Vec<AuditEntry> {
        self.entries.lock().unwrap().iter().take(limit).cloned().collect()
    }
}
