//! # appdesk-audit
//!
//! Append-to-front, capped audit trail of administrative actions.
//!
//! ## Overview
//!
//! Every state-changing admin operation (status change, deletion) hands an
//! `AuditEvent` to an `AuditSink`. `DocumentAuditLog` stamps it with an id
//! and timestamp and stores it at the front of the `audit-logs` document,
//! keeping only the most recent `capacity` entries (1000 by default).
//! Entries are never edited or removed individually.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use appdesk_audit::DocumentAuditLog;
//! use appdesk_core::traits::AuditSink;
//!
//! let audit = DocumentAuditLog::new(store.clone());
//! audit.record(AuditEvent::new("APPLICATION_DELETED", &admin).target("a1", "application"));
//! let recent = audit.list(100);
//! ```

pub mod trail;

pub use trail::DocumentAuditLog;

// ── Tests ─────────────────────────────────────────────────────────────────────
