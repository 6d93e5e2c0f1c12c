//! Shared-secret admin gate.
//!
//! The admin session credential is a single token compared against a
//! configured secret. Both sides are hashed with SHA-256 first and the
//! digests compared without early exit, so the comparison time does not
//! depend on where the first mismatching byte is.

use sha2::{Digest, Sha256};
use tracing::debug;

use appdesk_contracts::admin::AdminIdentity;

use crate::traits::AdminGate;

/// Secret accepted when the configured environment variable is unset.
pub const FALLBACK_ADMIN_SECRET: &str = "admin-authenticated";

/// Environment variable the secret is read from by default.
pub const DEFAULT_SECRET_ENV: &str = "ADMIN_SESSION_SECRET";

/// An `AdminGate` that accepts exactly one session token.
pub struct TokenGate {
    secret_digest: [u8; 32],
    identity: AdminIdentity,
}

impl TokenGate {
    /// Accept `secret`; authorized requests act as `identity`.
    pub fn new(secret: &str, identity: AdminIdentity) -> Self {
        Self {
            secret_digest: digest(secret),
            identity,
        }
    }

    /// Read the secret from environment variable `var`, falling back to
    /// `FALLBACK_ADMIN_SECRET` when it is unset or empty.
    pub fn from_env(var: &str, identity: AdminIdentity) -> Self {
        match std::env::var(var) {
            Ok(secret) if !secret.is_empty() => Self::new(&secret, identity),
            _ => {
                debug!(env = %var, "admin secret not set; using fallback secret");
                Self::new(FALLBACK_ADMIN_SECRET, identity)
            }
        }
    }
}

impl AdminGate for TokenGate {
    fn authorize(&self, credential: Option<&str>) -> Option<AdminIdentity> {
        let credential = credential.filter(|c| !c.is_empty())?;
        if constant_time_eq(&digest(credential), &self.secret_digest) {
            Some(self.identity.clone())
        } else {
            None
        }
    }
}

fn digest(s: &str) -> [u8; 32] {
    Sha256::digest(s.as_bytes()).into()
}

fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_token_yields_identity() {
        let gate = TokenGate::new("s3cret", AdminIdentity::new("moderator"));
        assert_eq!(
            gate.authorize(Some("s3cret")),
            Some(AdminIdentity::new("moderator"))
        );
    }

    #[test]
    fn test_wrong_missing_or_empty_token_rejected() {
        let gate = TokenGate::new("s3cret", AdminIdentity::default());
        assert_eq!(gate.authorize(Some("s3cret ")), None);
        assert_eq!(gate.authorize(Some("")), None);
        assert_eq!(gate.authorize(None), None);
    }

    #[test]
    fn test_unset_env_falls_back_to_default_secret() {
        let gate = TokenGate::from_env("APPDESK_TEST_SECRET_NEVER_SET", AdminIdentity::default());
        assert!(gate.authorize(Some(FALLBACK_ADMIN_SECRET)).is_some());
    }
}
