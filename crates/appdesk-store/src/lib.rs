//! # appdesk-store
//!
//! `DocumentStore` backends for appdesk.
//!
//! | Backend       | Where documents live                    | Failure surface            |
//! |---------------|-----------------------------------------|----------------------------|
//! | `MemoryStore` | a shared in-process map                 | injectable, for tests      |
//! | `FileStore`   | `<dir>/<key>.json`, replaced atomically | write errors surface       |
//! | `GistStore`   | `<key>.json` files in one GitHub gist   | everything degrades        |
//!
//! `StoreConfig::build` picks one from configuration. All three are used
//! through `Arc<dyn DocumentStore>`; nothing above this crate knows which
//! one is active.

pub mod config;
pub mod file;
pub mod gist;
pub mod memory;

pub use config::{BackendKind, StoreConfig};
pub use file::FileStore;
pub use gist::GistStore;
pub use memory::{FailureMode, MemoryStore};
