//! The application repository: read-modify-write over the single
//! `applications` document.
//!
//! Each mutation is one unsynchronized cycle:
//!
//!   load document → mutate in memory → persist document → audit (if changed)
//!
//! Concurrent cycles against the same store are last-writer-wins; an
//! overlapping writer's change can be lost. Reads never touch the audit log.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use appdesk_contracts::{
    admin::Actor,
    application::{new_record_id, Application},
    audit::{
        AuditEvent, ACTION_APPLICATION_DELETED, ACTION_APPLICATION_STATUS_CHANGED,
        TARGET_APPLICATION,
    },
    document::ApplicationsDocument,
    error::{AppdeskError, AppdeskResult},
};

use crate::{
    document::{load, persist},
    traits::{AuditSink, DocumentStore},
};

/// Result of `ApplicationRepository::update_status`.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusChange {
    /// The application existed; its previous status value is returned
    /// (`Null` if the record had none).
    Updated { old_status: Value },
    /// No application with that id. Nothing was written or audited.
    Missing,
}

/// Collection-level operations on applications.
///
/// Holds shared handles to the store and the audit sink so several
/// repositories (or a repository and an audit reader) can sit on the same
/// backend.
pub struct ApplicationRepository {
    store: Arc<dyn DocumentStore>,
    audit: Arc<dyn AuditSink>,
}

impl ApplicationRepository {
    pub fn new(store: Arc<dyn DocumentStore>, audit: Arc<dyn AuditSink>) -> Self {
        Self { store, audit }
    }

    /// Every application in insertion order. Never fails.
    pub fn list_applications(&self) -> Vec<Application> {
        load::<ApplicationsDocument>(self.store.as_ref()).doc.applications
    }

    /// Append a new pending application built from `payload`.
    ///
    /// Returns the generated id.
    ///
    /// # Errors
    ///
    /// - `MalformedPayload` if `payload` is not an object. Checked before
    ///   store access.
    /// - `Persistence` if the current document exists but could not be read
    ///   (writing would drop every stored application), or the backend
    ///   surfaced a write failure.
    pub fn submit_application(&self, payload: Value) -> AppdeskResult<String> {
        let application = Application::from_submission(payload, new_record_id(), Utc::now())?;
        let id = application.id().unwrap_or_default().to_string();

        let mut snapshot = load::<ApplicationsDocument>(self.store.as_ref());
        if !snapshot.is_writable() {
            return Err(AppdeskError::Persistence {
                reason: "applications document could not be read; refusing to overwrite it"
                    .to_string(),
            });
        }

        snapshot.doc.applications.push(application);
        persist(self.store.as_ref(), &snapshot.doc)?;

        info!(
            application_id = %id,
            total = snapshot.doc.applications.len(),
            "application submitted"
        );
        Ok(id)
    }

    /// Set the status of application `id` and refresh its `updatedAt`.
    ///
    /// An unknown id is a silent no-op: the collection is left untouched and
    /// no audit entry is produced.
    pub fn update_status(
        &self,
        actor: &Actor,
        id: &str,
        new_status: &str,
    ) -> AppdeskResult<StatusChange> {
        let mut snapshot = load::<ApplicationsDocument>(self.store.as_ref());
        if !snapshot.is_writable() {
            warn!(application_id = %id, "skipping status update; applications unreadable");
            return Ok(StatusChange::Missing);
        }

        let Some(app) = snapshot.doc.applications.iter_mut().find(|a| a.id() == Some(id)) else {
            debug!(application_id = %id, "status update for unknown application ignored");
            return Ok(StatusChange::Missing);
        };

        let old_status = app.set_status(new_status, Utc::now()).unwrap_or(Value::Null);
        let details = json!({
            "oldStatus": old_status,
            "newStatus": new_status,
            "applicationType": app.kind(),
            "discordUsername": app.discord_username(),
        });

        persist(self.store.as_ref(), &snapshot.doc)?;

        info!(
            application_id = %id,
            old_status = %old_status,
            new_status = %new_status,
            admin = %actor.identity.name(),
            "application status changed"
        );
        self.audit.record(
            AuditEvent::new(ACTION_APPLICATION_STATUS_CHANGED, &actor.identity)
                .target(id, TARGET_APPLICATION)
                .details(details)
                .with_meta(&actor.meta),
        );

        Ok(StatusChange::Updated { old_status })
    }

    /// Remove every application whose id equals `id`.
    ///
    /// Returns the first removed application, if any. The reduced collection
    /// is written back even when nothing matched.
    ///
    /// # Errors
    ///
    /// `Validation` if `id` is empty, before any store access. Any other
    /// string, whitespace included, is matched literally.
    pub fn delete_application(&self, actor: &Actor, id: &str) -> AppdeskResult<Option<Application>> {
        if id.is_empty() {
            return Err(AppdeskError::Validation {
                reason: "application id required".to_string(),
            });
        }

        let mut snapshot = load::<ApplicationsDocument>(self.store.as_ref());
        if !snapshot.is_writable() {
            warn!(application_id = %id, "skipping delete; applications unreadable");
            return Ok(None);
        }

        let removed = snapshot
            .doc
            .applications
            .iter()
            .find(|a| a.id() == Some(id))
            .cloned();
        snapshot.doc.applications.retain(|a| a.id() != Some(id));

        persist(self.store.as_ref(), &snapshot.doc)?;

        if let Some(app) = &removed {
            info!(application_id = %id, admin = %actor.identity.name(), "application deleted");
            self.audit.record(
                AuditEvent::new(ACTION_APPLICATION_DELETED, &actor.identity)
                    .target(id, TARGET_APPLICATION)
                    .details(json!({
                        "applicationType": app.kind(),
                        "discordUsername": app.discord_username(),
                        "status": app.get("status"),
                    }))
                    .with_meta(&actor.meta),
            );
        }

        Ok(removed)
    }
}
