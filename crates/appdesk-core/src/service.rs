//! Admin-facing service facade.
//!
//! `AdminService` is what a route layer calls. Every admin operation runs
//! the gate first; a rejected credential returns `Unauthorized` before the
//! store is touched. Public submission skips the gate.
//!
//! | Route                          | Method                |
//! |--------------------------------|-----------------------|
//! | GET    admin applications      | `list_applications`   |
//! | PUT    admin applications      | `update_status`       |
//! | DELETE admin applications?id=  | `delete_application`  |
//! | GET    admin audit logs        | `audit_logs`          |
//! | POST   public submission       | `submit`              |

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use appdesk_contracts::{
    admin::{Actor, AdminIdentity, RequestMeta},
    application::Application,
    audit::{AuditEntry, DEFAULT_AUDIT_LIMIT},
    error::{AppdeskError, AppdeskResult},
};

use crate::{
    repository::{ApplicationRepository, StatusChange},
    traits::{AdminGate, AuditSink, DocumentStore},
};

/// Body of a status update request: `{ "id": ..., "status": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub id: String,
    pub status: String,
}

pub struct AdminService {
    gate: Box<dyn AdminGate>,
    repository: ApplicationRepository,
    audit: Arc<dyn AuditSink>,
}

impl AdminService {
    pub fn new(
        gate: Box<dyn AdminGate>,
        store: Arc<dyn DocumentStore>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            gate,
            repository: ApplicationRepository::new(store, Arc::clone(&audit)),
            audit,
        }
    }

    /// Public submission. Returns the new application's id.
    pub fn submit(&self, payload: Value) -> AppdeskResult<String> {
        self.repository.submit_application(payload)
    }

    pub fn list_applications(&self, credential: Option<&str>) -> AppdeskResult<Vec<Application>> {
        self.authorize(credential)?;
        Ok(self.repository.list_applications())
    }

    /// Change an application's status.
    ///
    /// An unknown id still succeeds and yields `StatusChange::Missing`.
    pub fn update_status(
        &self,
        credential: Option<&str>,
        meta: RequestMeta,
        request: &UpdateStatusRequest,
    ) -> AppdeskResult<StatusChange> {
        let actor = Actor::new(self.authorize(credential)?, meta);
        self.repository
            .update_status(&actor, &request.id, &request.status)
    }

    /// Delete by id. A missing or empty id is a `Validation` error.
    pub fn delete_application(
        &self,
        credential: Option<&str>,
        meta: RequestMeta,
        id: Option<&str>,
    ) -> AppdeskResult<()> {
        let actor = Actor::new(self.authorize(credential)?, meta);
        self.repository
            .delete_application(&actor, id.unwrap_or_default())?;
        Ok(())
    }

    /// The most recent audit entries, newest first. `limit` defaults to
    /// `DEFAULT_AUDIT_LIMIT`.
    pub fn audit_logs(
        &self,
        credential: Option<&str>,
        limit: Option<usize>,
    ) -> AppdeskResult<Vec<AuditEntry>> {
        self.authorize(credential)?;
        Ok(self.audit.list(limit.unwrap_or(DEFAULT_AUDIT_LIMIT)))
    }

    fn authorize(&self, credential: Option<&str>) -> AppdeskResult<AdminIdentity> {
        self.gate.authorize(credential).ok_or_else(|| {
            warn!(credential_present = credential.is_some(), "admin gate rejected request");
            AppdeskError::Unauthorized
        })
    }
}
