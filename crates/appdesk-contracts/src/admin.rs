//! Admin identity and request provenance.

use serde::{Deserialize, Serialize};

/// Name used when no other admin identity is configured.
pub const DEFAULT_ADMIN_USER: &str = "admin";

/// The admin an authorized request acts as.
///
/// Produced by an `AdminGate` and written into every audit entry as
/// `adminUser`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdminIdentity(pub String);

impl AdminIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for AdminIdentity {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_USER)
    }
}

/// Optional details about where a request came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Who is performing an administrative action, and from where.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Actor {
    pub identity: AdminIdentity,
    pub meta: RequestMeta,
}

impl Actor {
    pub fn new(identity: AdminIdentity, meta: RequestMeta) -> Self {
        Self { identity, meta }
    }
}
