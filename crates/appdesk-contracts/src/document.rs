//! Whole-document shapes persisted through a `DocumentStore`.
//!
//! Exactly two logical documents exist. Each knows its own store key and
//! its empty default, so "no data yet" is never an error.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::application::Application;
use crate::audit::AuditEntry;

/// The fixed logical keys a backend is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKey {
    Applications,
    AuditLogs,
}

impl DocumentKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKey::Applications => "applications",
            DocumentKey::AuditLogs => "audit-logs",
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A JSON document stored under a fixed key with an empty default.
pub trait Document: Default + Serialize + DeserializeOwned {
    const KEY: DocumentKey;
}

/// `{ "applications": [ ... ] }`, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationsDocument {
    #[serde(default)]
    pub applications: Vec<Application>,
}

impl Document for ApplicationsDocument {
    const KEY: DocumentKey = DocumentKey::Applications;
}

/// `{ "logs": [ ... ] }`, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditDocument {
    #[serde(default)]
    pub logs: Vec<AuditEntry>,
}

impl Document for AuditDocument {
    const KEY: DocumentKey = DocumentKey::AuditLogs;
}
