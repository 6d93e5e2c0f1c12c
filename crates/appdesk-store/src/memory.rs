//! In-process `DocumentStore`.
//!
//! `MemoryStore` keeps documents in a `HashMap` behind a `Mutex`. Clones
//! share the same map, so a repository and an audit log built from two
//! clones see each other's writes. Access counters and a switchable
//! failure mode make it the workhorse of the test suites.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use appdesk_contracts::{
    document::DocumentKey,
    error::{StoreError, StoreResult},
};
use appdesk_core::traits::DocumentStore;

const BACKEND: &str = "memory";

/// Failure behaviour of a `MemoryStore`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    #[default]
    Healthy,
    /// Every call reports `NotConfigured`.
    Unconfigured,
    /// Every call reports `Unavailable`.
    Unreachable,
    /// Reads work; writes report `Persistence`.
    ReadOnly,
}

#[derive(Default)]
struct Inner {
    docs: Mutex<HashMap<DocumentKey, Value>>,
    failure: Mutex<FailureMode>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch failure behaviour for all clones of this store.
    pub fn set_failure(&self, mode: FailureMode) {
        if let Ok(mut failure) = self.inner.failure.lock() {
            *failure = mode;
        }
    }

    /// Put `value` under `key` directly, without counting an access.
    pub fn seed(&self, key: DocumentKey, value: Value) {
        if let Ok(mut docs) = self.inner.docs.lock() {
            docs.insert(key, value);
        }
    }

    /// The raw stored value for `key`, without counting an access.
    pub fn peek(&self, key: DocumentKey) -> Option<Value> {
        self.inner.docs.lock().ok()?.get(&key).cloned()
    }

    pub fn reads(&self) -> usize {
        self.inner.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Total `get` + `set` calls made through the trait.
    pub fn accesses(&self) -> usize {
        self.reads() + self.writes()
    }

    fn failure(&self) -> StoreResult<FailureMode> {
        self.inner
            .failure
            .lock()
            .map(|f| *f)
            .map_err(|e| poisoned(e.to_string()))
    }
}

fn poisoned(reason: String) -> StoreError {
    StoreError::Unavailable {
        backend: BACKEND,
        reason: format!("memory store lock poisoned: {}", reason),
    }
}

impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    fn get(&self, key: DocumentKey) -> StoreResult<Option<Value>> {
        self.inner.reads.fetch_add(1, Ordering::SeqCst);
        match self.failure()? {
            FailureMode::Unconfigured => Err(StoreError::NotConfigured { backend: BACKEND }),
            FailureMode::Unreachable => Err(StoreError::Unavailable {
                backend: BACKEND,
                reason: "simulated outage".to_string(),
            }),
            FailureMode::Healthy | FailureMode::ReadOnly => {
                let docs = self.inner.docs.lock().map_err(|e| poisoned(e.to_string()))?;
                Ok(docs.get(&key).cloned())
            }
        }
    }

    fn set(&self, key: DocumentKey, value: &Value) -> StoreResult<()> {
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        match self.failure()? {
            FailureMode::Unconfigured => Err(StoreError::NotConfigured { backend: BACKEND }),
            FailureMode::Unreachable => Err(StoreError::Unavailable {
                backend: BACKEND,
                reason: "simulated outage".to_string(),
            }),
            FailureMode::ReadOnly => Err(StoreError::Persistence {
                key: key.to_string(),
                reason: "memory store is read-only".to_string(),
            }),
            FailureMode::Healthy => {
                let mut docs = self.inner.docs.lock().map_err(|e| poisoned(e.to_string()))?;
                docs.insert(key, value.clone());
                Ok(())
            }
        }
    }
}
