//! appdesk configuration file.
//!
//! Every table and field is optional; a missing file means "all defaults"
//! (file backend under `./data`, admin secret from `ADMIN_SESSION_SECRET`).
//!
//! ```toml
//! [store]
//! backend = "file"
//! path = "data"
//!
//! [admin]
//! secret_env = "ADMIN_SESSION_SECRET"
//! user = "admin"
//!
//! [audit]
//! capacity = 1000
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use appdesk_audit::DocumentAuditLog;
use appdesk_contracts::{
    admin::{AdminIdentity, DEFAULT_ADMIN_USER},
    audit::DEFAULT_AUDIT_CAPACITY,
    error::{AppdeskError, AppdeskResult},
};
use appdesk_core::{gate::DEFAULT_SECRET_ENV, AdminService, TokenGate};
use appdesk_store::StoreConfig;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "appdesk.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Environment variable holding the admin session secret.
    pub secret_env: String,
    /// Identity recorded as `adminUser` in audit entries.
    pub user: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            secret_env: DEFAULT_SECRET_ENV.to_string(),
            user: DEFAULT_ADMIN_USER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub capacity: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_AUDIT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub admin: AdminConfig,
    pub audit: AuditConfig,
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> AppdeskResult<Self> {
        toml::from_str(s).map_err(|e| AppdeskError::Config {
            reason: format!("failed to parse config TOML: {}", e),
        })
    }

    pub fn from_file(path: &Path) -> AppdeskResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| AppdeskError::Config {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load `explicit` if given; otherwise `appdesk.toml` if present;
    /// otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> AppdeskResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.exists() {
            Self::from_file(fallback)
        } else {
            debug!("no config file found; using defaults");
            Ok(Self::default())
        }
    }

    /// Wire the configured store, audit log and admin gate together.
    pub fn build_service(&self) -> AppdeskResult<AdminService> {
        if self.audit.capacity == 0 {
            return Err(AppdeskError::Config {
                reason: "audit.capacity must be at least 1".to_string(),
            });
        }

        let store = self.store.build()?;
        let audit = Arc::new(DocumentAuditLog::with_capacity(
            Arc::clone(&store),
            self.audit.capacity,
        ));
        let gate = TokenGate::from_env(&self.admin.secret_env, AdminIdentity::new(&self.admin.user));

        Ok(AdminService::new(Box::new(gate), store, audit))
    }
}
