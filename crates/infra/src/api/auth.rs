//! Bearer token access for the request pipeline
//!
//! The pipeline never writes tokens. It asks a [`TokenProvider`] for the
//! current token on every attempt, so a login or logout between retries is
//! picked up by the next attempt.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, warn};

/// Read-only key/value storage holding the token
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Implement TokenStore for Arc<S> so the owning application can keep a handle
impl<S: TokenStore + ?Sized> TokenStore for Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// Trait for providing bearer tokens
///
/// This trait allows dependency injection and testing with multiple
/// simulated identities.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current token, or `None` when the request should go out anonymous
    async fn bearer_token(&self) -> Option<String>;
}

/// Provider reading the token from a [`TokenStore`] under a fixed key
#[derive(Debug)]
pub struct StoredTokenProvider<S> {
    store: S,
    key: String,
}

impl<S: TokenStore> StoredTokenProvider<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }
}

#[async_trait]
impl<S: TokenStore> TokenProvider for StoredTokenProvider<S> {
    async fn bearer_token(&self) -> Option<String> {
        self.store.get(&self.key).filter(|token| !token.is_empty())
    }
}

/// Provider returning the same token for every request
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Option<String> {
        (!self.token.is_empty()).then(|| self.token.clone())
    }
}

/// Provider for anonymous clients
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTokenProvider;

#[async_trait]
impl TokenProvider for NoTokenProvider {
    async fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// Process-local token store
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.write().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries.write().remove(key)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl TokenStore for InMemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }
}

/// Token store backed by a JSON object on disk
///
/// The file is re-read on every lookup. String values are returned as-is,
/// any other JSON value as its JSON text. A missing or unreadable file reads
/// as empty.
///
/// Lookups block on file I/O. Inside the request pipeline use
/// [`FileTokenProvider`], which moves the read onto the blocking pool.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Option<serde_json::Map<String, Value>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "token file does not exist");
                return None;
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to read token file");
                return None;
            }
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(entries)) => Some(entries),
            Ok(_) => {
                warn!(path = %self.path.display(), "token file is not a JSON object");
                None
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to parse token file");
                None
            }
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_entries()?.remove(key)? {
            Value::Null => None,
            Value::String(value) => Some(value),
            other => Some(other.to_string()),
        }
    }
}

/// Provider reading the token from a [`FileTokenStore`] off the async runtime
#[derive(Debug, Clone)]
pub struct FileTokenProvider {
    store: FileTokenStore,
    key: String,
}

impl FileTokenProvider {
    pub fn new(store: FileTokenStore, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }
}

#[async_trait]
impl TokenProvider for FileTokenProvider {
    async fn bearer_token(&self) -> Option<String> {
        let store = self.store.clone();
        let key = self.key.clone();

        match tokio::task::spawn_blocking(move || store.get(&key)).await {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(err) => {
                warn!(path = %self.store.path().display(), error = %err, "token file read task failed");
                None
            }
        }
    }
}
