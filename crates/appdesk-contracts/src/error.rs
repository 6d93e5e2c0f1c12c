//! Error types for appdesk.
//!
//! Two layers of failure exist. `StoreError` is what a document backend
//! reports; it never reaches an HTTP-facing caller directly because the
//! typed document layer in appdesk-core degrades most of it to "empty".
//! `AppdeskError` is what repository and service operations return.

use thiserror::Error;

/// A failure reported by a `DocumentStore` backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend has no credentials or target to talk to.
    ///
    /// Reads degrade to the empty document and writes are dropped.
    #[error("{backend} backend is not configured")]
    NotConfigured { backend: &'static str },

    /// The backend could not be reached or refused the request.
    #[error("{backend} backend unavailable: {reason}")]
    Unavailable { backend: &'static str, reason: String },

    /// The stored bytes could not be decoded into the expected document.
    #[error("document '{key}' is malformed: {reason}")]
    Malformed { key: String, reason: String },

    /// The backend refused a write and chose to surface it.
    #[error("failed to persist document '{key}': {reason}")]
    Persistence { key: String, reason: String },
}

impl StoreError {
    /// True when the failure means "nothing to talk to", as opposed to a
    /// backend that exists but misbehaved.
    pub fn is_not_configured(&self) -> bool {
        matches!(self, StoreError::NotConfigured { .. })
    }
}

/// Convenience alias for backend operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// The unified error type for repository and service operations.
#[derive(Debug, Error)]
pub enum AppdeskError {
    /// The request is missing something required before any store access.
    #[error("validation error: {reason}")]
    Validation { reason: String },

    /// The admin gate rejected the presented credential.
    #[error("unauthorized")]
    Unauthorized,

    /// A submission body could not be merged into an application record.
    #[error("malformed payload: {reason}")]
    MalformedPayload { reason: String },

    /// The referenced entity does not exist.
    #[error("application '{id}' not found")]
    NotFound { id: String },

    /// A write the backend chose to surface failed, or the current
    /// document could not be read safely before a mutation.
    #[error("persistence error: {reason}")]
    Persistence { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppdeskError {
    /// True for failures the caller caused (the 4xx family).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppdeskError::Validation { .. }
                | AppdeskError::Unauthorized
                | AppdeskError::MalformedPayload { .. }
                | AppdeskError::NotFound { .. }
        )
    }
}

/// Convenience alias used throughout the appdesk crates.
pub type AppdeskResult<T> = Result<T, AppdeskError>;
