//! Filesystem `DocumentStore`.
//!
//! Each document lives in its own pretty-printed JSON file,
//! `<dir>/<key>.json`. Writes go to a uniquely named temporary file in the
//! same directory which is then renamed over the target, so a reader never
//! observes a half-written document.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use appdesk_contracts::{
    document::DocumentKey,
    error::{StoreError, StoreResult},
};
use appdesk_core::traits::DocumentStore;

const BACKEND: &str = "file";

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store documents under `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: DocumentKey) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl DocumentStore for FileStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    fn get(&self, key: DocumentKey) -> StoreResult<Option<Value>> {
        let path = self.path_for(key);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Unavailable {
                    backend: BACKEND,
                    reason: format!("failed to read '{}': {}", path.display(), e),
                })
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| StoreError::Malformed {
                key: key.to_string(),
                reason: format!("'{}': {}", path.display(), e),
            })
    }

    /// Failures here surface as `Persistence`: a local disk that cannot be
    /// written is an operator problem, not a transient outage.
    fn set(&self, key: DocumentKey, value: &Value) -> StoreResult<()> {
        let persistence = |reason: String| StoreError::Persistence {
            key: key.to_string(),
            reason,
        };

        fs::create_dir_all(&self.dir).map_err(|e| {
            persistence(format!("failed to create '{}': {}", self.dir.display(), e))
        })?;

        let body = serde_json::to_string_pretty(value)
            .map_err(|e| persistence(format!("failed to encode: {}", e)))?;

        let target = self.path_for(key);
        let tmp = self
            .dir
            .join(format!(".{}.{}.tmp", key, uuid::Uuid::new_v4().simple()));

        fs::write(&tmp, body)
            .map_err(|e| persistence(format!("failed to write '{}': {}", tmp.display(), e)))?;

        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(persistence(format!(
                "failed to replace '{}': {}",
                target.display(),
                e
            )));
        }

        debug!(path = %target.display(), "document file replaced");
        Ok(())
    }
}
