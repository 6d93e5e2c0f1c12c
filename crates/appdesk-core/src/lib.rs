//! # appdesk-core
//!
//! The storage seam and collection logic for appdesk.
//!
//! This crate provides:
//! - The three core traits (`DocumentStore`, `AuditSink`, `AdminGate`)
//! - Fail-open typed document access (`document::load` / `document::persist`)
//! - `ApplicationRepository`, the read-modify-write operations on the
//!   `applications` collection
//! - `TokenGate`, a shared-secret `AdminGate`
//! - `AdminService`, the gate-then-repository facade a route layer calls
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use appdesk_core::{AdminService, TokenGate};
//!
//! let service = AdminService::new(Box::new(gate), store, audit);
//! let id = service.submit(payload)?;
//! let apps = service.list_applications(Some(&session))?;
//! ```

pub mod document;
pub mod gate;
pub mod repository;
pub mod service;
pub mod traits;

#[cfg(test)]
mod fixtures;

pub use gate::TokenGate;
pub use repository::{ApplicationRepository, StatusChange};
pub use service::{AdminService, UpdateStatusRequest};

// ── Tests ─────────────────────────────────────────────────────────────────────
