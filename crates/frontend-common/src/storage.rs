//! `localStorage` backend for the token store

use codemarket_http::{Storage, StorageError};
use gloo::storage::{LocalStorage, Storage as _};

/// Tokens kept in the browser's `localStorage`
///
/// Values are stored as plain strings, not JSON, so other scripts on the
/// page read the same keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

fn backend_error(err: impl std::fmt::Debug) -> StorageError {
    StorageError::Backend(format!("{err:?}"))
}

impl Storage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        LocalStorage::raw().get_item(key).map_err(backend_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(backend_error)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        LocalStorage::raw().remove_item(key).map_err(backend_error)
    }
}
