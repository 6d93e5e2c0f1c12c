//! Core trait definitions for appdesk.
//!
//! These three traits are the seams the rest of the workspace plugs into:
//!
//! - `DocumentStore`: swappable persistence of whole JSON documents
//! - `AuditSink`:     capped, newest-first record of admin actions
//! - `AdminGate`:     decides whether a credential belongs to an admin
//!
//! `ApplicationRepository` and `AdminService` are written against these
//! traits only; no backend is hardcoded anywhere above the store crate.

use serde_json::Value;

use appdesk_contracts::{
    admin::AdminIdentity,
    audit::{AuditEntry, AuditEvent},
    document::DocumentKey,
    error::StoreResult,
};

/// A key-value store of whole JSON documents.
///
/// Implementations report failures honestly through `StoreError`; the
/// fail-open policy (absent or broken means empty) is applied one layer up
/// in `crate::document`, not here.
///
/// There is no compare-and-swap. Two overlapping read-modify-write cycles
/// against the same key resolve as last-writer-wins.
pub trait DocumentStore: Send + Sync {
    /// Short backend name used in diagnostics (e.g. `"file"`).
    fn backend(&self) -> &'static str;

    /// Fetch the document stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn get(&self, key: DocumentKey) -> StoreResult<Option<Value>>;

    /// Replace the document stored under `key`.
    ///
    /// A subsequent `get` on the same instance must observe the whole new
    /// document, never a partial write.
    fn set(&self, key: DocumentKey, value: &Value) -> StoreResult<()>;
}

/// The audit trail of administrative actions.
///
/// Recording is advisory: an implementation must never let a failure to
/// record block or fail the action being described, so `record` has no
/// error channel.
pub trait AuditSink: Send + Sync {
    /// Stamp and store one event at the front of the log.
    fn record(&self, event: AuditEvent);

    /// The `limit` most recent entries, newest first.
    fn list(&self, limit: usize) -> Vec<AuditEntry>;
}

/// Admin authentication predicate.
pub trait AdminGate: Send + Sync {
    /// Return the admin identity the credential belongs to, or `None` if
    /// the credential is absent or wrong.
    fn authorize(&self, credential: Option<&str>) -> Option<AdminIdentity>;
}
