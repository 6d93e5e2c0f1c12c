//! Typed, fail-open access to documents in a `DocumentStore`.
//!
//! Reads never fail: an absent, unconfigured or broken backend yields the
//! document's empty default. The returned `Snapshot` remembers *why* it is
//! empty so that mutations can refuse to write back over a document that
//! exists but could not be read.
//!
//! Writes swallow `NotConfigured` and `Unavailable` (logged only) and
//! surface everything else as `AppdeskError::Persistence`.

use tracing::{debug, warn};

use appdesk_contracts::{
    document::Document,
    error::{AppdeskError, AppdeskResult, StoreError},
};

use crate::traits::DocumentStore;

/// Where the contents of a `Snapshot` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Decoded from what the backend returned.
    Stored,
    /// Nothing stored yet, or no backend configured.
    Empty,
    /// The backend failed or returned garbage; this is a stand-in default.
    Degraded,
}

/// A document as loaded for one operation.
#[derive(Debug, Clone)]
pub struct Snapshot<D> {
    pub doc: D,
    pub origin: Origin,
}

impl<D> Snapshot<D> {
    /// False when writing `doc` back could clobber data we failed to read.
    pub fn is_writable(&self) -> bool {
        self.origin != Origin::Degraded
    }
}

/// Load `D` from `store`, degrading to `D::default()` on any failure.
pub fn load<D: Document>(store: &dyn DocumentStore) -> Snapshot<D> {
    let key = D::KEY;
    match store.get(key) {
        Ok(Some(value)) => match serde_json::from_value::<D>(value) {
            Ok(doc) => Snapshot {
                doc,
                origin: Origin::Stored,
            },
            Err(e) => {
                warn!(
                    backend = store.backend(),
                    key = %key,
                    error = %e,
                    "stored document does not decode; using empty default"
                );
                Snapshot {
                    doc: D::default(),
                    origin: Origin::Degraded,
                }
            }
        },
        Ok(None) => {
            debug!(backend = store.backend(), key = %key, "document absent; using empty default");
            Snapshot {
                doc: D::default(),
                origin: Origin::Empty,
            }
        }
        Err(e) if e.is_not_configured() => {
            warn!(backend = store.backend(), key = %key, "no storage configured; returning empty");
            Snapshot {
                doc: D::default(),
                origin: Origin::Empty,
            }
        }
        Err(e) => {
            warn!(
                backend = store.backend(),
                key = %key,
                error = %e,
                "document read failed; using empty default"
            );
            Snapshot {
                doc: D::default(),
                origin: Origin::Degraded,
            }
        }
    }
}

/// Write `doc` to `store` under `D::KEY`.
pub fn persist<D: Document>(store: &dyn DocumentStore, doc: &D) -> AppdeskResult<()> {
    let key = D::KEY;
    let value = serde_json::to_value(doc).map_err(|e| AppdeskError::Persistence {
        reason: format!("failed to encode document '{}': {}", key, e),
    })?;

    match store.set(key, &value) {
        Ok(()) => {
            debug!(backend = store.backend(), key = %key, "document written");
            Ok(())
        }
        Err(e @ StoreError::NotConfigured { .. }) => {
            warn!(backend = store.backend(), key = %key, error = %e, "data not persisted");
            Ok(())
        }
        Err(e @ StoreError::Unavailable { .. }) => {
            warn!(backend = store.backend(), key = %key, error = %e, "document write dropped");
            Ok(())
        }
        Err(e) => Err(AppdeskError::Persistence {
            reason: e.to_string(),
        }),
    }
}
