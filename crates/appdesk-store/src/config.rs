//! Backend selection.
//!
//! `StoreConfig` is the `[store]` table of the appdesk configuration file.
//! Secrets never live in the file: the gist token is read from the
//! environment variable named by `token_env`, and `GIST_ID` in the
//! environment overrides `gist_id`.
//!
//! Example:
//! ```toml
//! [store]
//! backend = "gist"
//! gist_id = "0123456789abcdef"
//! token_env = "GITHUB_TOKEN"
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use appdesk_contracts::error::{AppdeskError, AppdeskResult};
use appdesk_core::traits::DocumentStore;

use crate::{
    file::FileStore,
    gist::{GistStore, DEFAULT_API_BASE},
    memory::MemoryStore,
};

/// Environment variable that overrides `StoreConfig::gist_id`.
pub const GIST_ID_ENV: &str = "GIST_ID";

/// Placeholder gist id that means "not set up yet".
const PLACEHOLDER_GIST_ID: &str = "temp";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    Memory,
    #[default]
    File,
    Gist,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: BackendKind,

    /// Directory for the file backend.
    pub path: PathBuf,

    pub gist_id: Option<String>,

    /// Name of the environment variable holding the gist token.
    pub token_env: String,

    pub api_base: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::File,
            path: PathBuf::from("data"),
            gist_id: None,
            token_env: "GITHUB_TOKEN".to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl StoreConfig {
    /// Build the configured backend, reading secrets from the process
    /// environment.
    pub fn build(&self) -> AppdeskResult<Arc<dyn DocumentStore>> {
        self.build_with_env(|name| std::env::var(name).ok())
    }

    /// Build the configured backend, resolving environment variables
    /// through `env`.
    ///
    /// A gist backend with missing credentials still builds: it reports
    /// `NotConfigured` on every call, which callers treat as empty.
    pub fn build_with_env<F>(&self, env: F) -> AppdeskResult<Arc<dyn DocumentStore>>
    where
        F: Fn(&str) -> Option<String>,
    {
        match self.backend {
            BackendKind::Memory => {
                info!("using in-memory document store; nothing survives the process");
                Ok(Arc::new(MemoryStore::new()))
            }
            BackendKind::File => {
                info!(path = %self.path.display(), "using file document store");
                Ok(Arc::new(FileStore::new(self.path.clone())))
            }
            BackendKind::Gist => {
                let gist_id = env(GIST_ID_ENV)
                    .or_else(|| self.gist_id.clone())
                    .filter(|id| !id.is_empty() && id != PLACEHOLDER_GIST_ID);
                let token = env(&self.token_env).filter(|t| !t.is_empty());

                let store = GistStore::new(self.api_base.clone(), gist_id, token).map_err(|e| {
                    AppdeskError::Config {
                        reason: e.to_string(),
                    }
                })?;
                if store.is_configured() {
                    info!(api_base = %self.api_base, "using gist document store");
                } else {
                    warn!(
                        token_env = %self.token_env,
                        "gist storage not configured; reads return empty and writes are dropped"
                    );
                }
                Ok(Arc::new(store))
            }
        }
    }
}
