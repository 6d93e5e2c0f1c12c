//! Audit log entry types.
//!
//! An `AuditEvent` is what a caller hands to the audit sink. The sink stamps
//! it with an identifier and a timestamp, producing an immutable
//! `AuditEntry` that is stored newest-first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::admin::{AdminIdentity, RequestMeta};
use crate::application::new_record_id;

/// Emitted when an admin changes an application's status.
pub const ACTION_APPLICATION_STATUS_CHANGED: &str = "APPLICATION_STATUS_CHANGED";

/// Emitted when an admin deletes an application.
pub const ACTION_APPLICATION_DELETED: &str = "APPLICATION_DELETED";

/// `targetType` used for entries about application records.
pub const TARGET_APPLICATION: &str = "application";

/// Number of entries the stored log retains.
pub const DEFAULT_AUDIT_CAPACITY: usize = 1000;

/// Number of entries returned by a listing when the caller does not say.
pub const DEFAULT_AUDIT_LIMIT: usize = 100;

/// An administrative action about to be recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub action: String,
    pub admin_user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl AuditEvent {
    pub fn new(action: impl Into<String>, admin: &AdminIdentity) -> Self {
        Self {
            action: action.into(),
            admin_user: admin.name().to_string(),
            target_id: None,
            target_type: None,
            details: None,
            ip_address: None,
            user_agent: None,
        }
    }

    /// Point the event at the entity it concerns.
    pub fn target(mut self, id: impl Into<String>, kind: impl Into<String>) -> Self {
        self.target_id = Some(id.into());
        self.target_type = Some(kind.into());
        self
    }

    pub fn details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Copy request provenance (client address, user agent) onto the event.
    pub fn with_meta(mut self, meta: &RequestMeta) -> Self {
        self.ip_address = meta.ip_address.clone();
        self.user_agent = meta.user_agent.clone();
        self
    }

    /// Stamp the event with a fresh identifier and the current time.
    pub fn into_entry(self) -> AuditEntry {
        AuditEntry {
            id: new_record_id(),
            timestamp: Utc::now(),
            action: self.action,
            admin_user: self.admin_user,
            target_id: self.target_id,
            target_type: self.target_type,
            details: self.details,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
        }
    }
}

/// A recorded administrative action. Never modified once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub admin_user: String,
    /// Lookup key of the affected entity, not an ownership link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}
