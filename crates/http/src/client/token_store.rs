//! Persistent bearer token storage
//!
//! Tokens live in a synchronous key/value [`Storage`] backend under two
//! fixed keys. Writes are visible to the next read immediately, which is
//! what lets the client pick up a fresh token right after login.

use codemarket_core::TokenPair;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::warn;

/// Storage key of the access token
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key of the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Token storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage contents are corrupt: {0}")]
    Corrupt(String),

    #[error("Storage backend unavailable: {0}")]
    Backend(String),
}

/// Synchronous string key/value storage that outlives the process
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage, gone when dropped
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// Access/refresh token pair persisted in a [`Storage`] backend
///
/// Both tokens are present or both are absent: a backend holding only one
/// of the two keys reads as empty.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn Storage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Token store backed by process memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Persist both tokens
    pub fn save(&self, pair: &TokenPair) -> Result<(), StorageError> {
        self.storage.set(ACCESS_TOKEN_KEY, &pair.access_token)?;
        if let Err(err) = self.storage.set(REFRESH_TOKEN_KEY, &pair.refresh_token) {
            // Never leave a lone access token behind
            let _ = self.storage.remove(ACCESS_TOKEN_KEY);
            return Err(err);
        }
        Ok(())
    }

    /// Remove both tokens
    pub fn clear(&self) -> Result<(), StorageError> {
        let access = self.storage.remove(ACCESS_TOKEN_KEY);
        let refresh = self.storage.remove(REFRESH_TOKEN_KEY);
        access.and(refresh)
    }

    /// Stored token pair, if both halves are present
    pub fn load(&self) -> Option<TokenPair> {
        match (self.read(ACCESS_TOKEN_KEY), self.read(REFRESH_TOKEN_KEY)) {
            (Some(access_token), Some(refresh_token)) => Some(TokenPair {
                access_token,
                refresh_token,
            }),
            _ => None,
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.load().map(|pair| pair.access_token)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.load().map(|pair| pair.refresh_token)
    }

    pub fn is_empty(&self) -> bool {
        self.load().is_none()
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(err) => {
                warn!(key, error = %err, "Failed to read token storage");
                None
            }
        }
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("has_tokens", &!self.is_empty())
            .finish()
    }
}
