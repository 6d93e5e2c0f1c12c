//! GitHub gist `DocumentStore`.
//!
//! Every document is one file, `<key>.json`, inside a single gist:
//!
//! - read:  `GET   {api_base}/gists/{id}` then `files["<key>.json"].content`
//! - write: `PATCH {api_base}/gists/{id}` with
//!   `{"files": {"<key>.json": {"content": "<pretty JSON>"}}}`
//!
//! A store without a token or gist id is `NotConfigured`; every call fails
//! fast without touching the network. HTTP and transport failures are
//! `Unavailable`.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use appdesk_contracts::{
    document::DocumentKey,
    error::{StoreError, StoreResult},
};
use appdesk_core::traits::DocumentStore;

const BACKEND: &str = "gist";

/// Public GitHub REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct GistResponse {
    #[serde(default)]
    files: HashMap<String, GistFile>,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    content: Option<String>,
    /// GitHub truncates large file contents in the gist listing; the full
    /// body is then only reachable through `raw_url`.
    #[serde(default)]
    truncated: bool,
    raw_url: Option<String>,
}

struct Target {
    gist_id: String,
    token: String,
}

pub struct GistStore {
    client: Client,
    api_base: String,
    target: Option<Target>,
}

impl GistStore {
    /// Build a store for gist `gist_id` authenticated by `token`.
    ///
    /// Either being `None` (or empty) leaves the store unconfigured.
    pub fn new(
        api_base: impl Into<String>,
        gist_id: Option<String>,
        token: Option<String>,
    ) -> StoreResult<Self> {
        let client = Client::builder()
            .user_agent("appdesk")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Unavailable {
                backend: BACKEND,
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self::with_client(client, api_base, gist_id, token))
    }

    fn with_client(
        client: Client,
        api_base: impl Into<String>,
        gist_id: Option<String>,
        token: Option<String>,
    ) -> Self {
        let target = match (gist_id, token) {
            (Some(gist_id), Some(token)) if !gist_id.is_empty() && !token.is_empty() => {
                Some(Target { gist_id, token })
            }
            _ => None,
        };

        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            target,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.target.is_some()
    }

    fn target(&self) -> StoreResult<&Target> {
        self.target
            .as_ref()
            .ok_or(StoreError::NotConfigured { backend: BACKEND })
    }

    fn authorized(&self, request: RequestBuilder, target: &Target) -> RequestBuilder {
        request
            .header(AUTHORIZATION, format!("token {}", target.token))
            .header(ACCEPT, GITHUB_ACCEPT)
    }

    fn gist_url(&self, target: &Target) -> String {
        format!("{}/gists/{}", self.api_base, target.gist_id)
    }

    fn fetch_raw(&self, target: &Target, raw_url: &str) -> StoreResult<String> {
        let response = self
            .authorized(self.client.get(raw_url), target)
            .send()
            .map_err(unavailable)?;
        if !response.status().is_success() {
            return Err(StoreError::Unavailable {
                backend: BACKEND,
                reason: format!("raw file fetch returned HTTP {}", response.status()),
            });
        }
        response.text().map_err(unavailable)
    }
}

fn unavailable(e: reqwest::Error) -> StoreError {
    StoreError::Unavailable {
        backend: BACKEND,
        reason: e.to_string(),
    }
}

fn file_name(key: DocumentKey) -> String {
    format!("{}.json", key)
}

/// Body of the PATCH request that replaces one document file.
fn patch_body(key: DocumentKey, value: &Value) -> StoreResult<Value> {
    let content = serde_json::to_string_pretty(value).map_err(|e| StoreError::Persistence {
        key: key.to_string(),
        reason: format!("failed to encode: {}", e),
    })?;
    let mut files = serde_json::Map::new();
    files.insert(file_name(key), json!({ "content": content }));
    Ok(json!({ "files": files }))
}

fn parse_content(key: DocumentKey, content: &str) -> StoreResult<Value> {
    serde_json::from_str(content).map_err(|e| StoreError::Malformed {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

impl DocumentStore for GistStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    fn get(&self, key: DocumentKey) -> StoreResult<Option<Value>> {
        let target = self.target()?;
        let response = self
            .authorized(self.client.get(self.gist_url(target)), target)
            .send()
            .map_err(unavailable)?;

        if !response.status().is_success() {
            return Err(StoreError::Unavailable {
                backend: BACKEND,
                reason: format!("gist read returned HTTP {}", response.status()),
            });
        }

        let gist: GistResponse = response.json().map_err(|e| StoreError::Malformed {
            key: key.to_string(),
            reason: format!("unexpected gist response: {}", e),
        })?;

        let Some(file) = gist.files.get(&file_name(key)) else {
            debug!(key = %key, "gist has no file for document");
            return Ok(None);
        };

        let content = match (&file.content, file.truncated, &file.raw_url) {
            (_, true, Some(raw_url)) => self.fetch_raw(target, raw_url)?,
            (Some(content), _, _) => content.clone(),
            (None, _, _) => return Ok(None),
        };

        let value = parse_content(key, &content)?;
        debug!(key = %key, bytes = content.len(), "read document from gist");
        Ok(Some(value))
    }

    fn set(&self, key: DocumentKey, value: &Value) -> StoreResult<()> {
        let target = self.target()?;
        let body = patch_body(key, value)?;

        let response = self
            .authorized(self.client.patch(self.gist_url(target)), target)
            .json(&body)
            .send()
            .map_err(unavailable)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(StoreError::Unavailable {
                backend: BACKEND,
                reason: format!("gist write returned HTTP {}: {}", status, detail),
            });
        }

        info!(key = %key, "wrote document to gist");
        Ok(())
    }
}
