//! Key-value session storage.
//!
//! Views never touch the session directly; they go through [`SessionStore`],
//! which is implemented for the request's `tower_sessions::Session` and for
//! an in-memory map used by tests and tooling.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tower_sessions::Session;

/// Errors raised by a session backend.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session backend error: {0}")]
    Backend(#[from] tower_sessions::session::Error),
}

/// String-keyed, string-valued storage scoped to one visitor.
pub trait SessionStore: Send + Sync {
    /// Read a value; `None` when the key is absent.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, SessionError>> + Send;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Delete a single key.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Delete every key.
    fn clear(&self) -> impl Future<Output = Result<(), SessionError>> + Send;
}

impl SessionStore for Session {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(Self::get::<String>(self, key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        Ok(Self::insert(self, key, value).await?)
    }

    async fn remove(&self, key: &str) -> Result<(), SessionError> {
        Self::remove::<serde_json::Value>(self, key).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        Self::clear(self).await;
        Ok(())
    }
}

/// In-memory store; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries
            .write()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        self.entries.write().await.clear();
        Ok(())
    }
}
