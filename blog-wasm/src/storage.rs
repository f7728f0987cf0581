use blog_core::{KeyValueStorage, MemoryStorage, StorageError};
use gloo_storage::{LocalStorage, Storage};
use std::sync::Arc;

/// `window.localStorage` as a key-value store.
pub struct BrowserStorage {
    _private: (),
}

impl BrowserStorage {
    /// Fails when the page has no usable `localStorage` (private mode, sandboxed iframe).
    pub fn open() -> Result<Self, StorageError> {
        let available = web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .is_some();

        if available {
            Ok(Self { _private: () })
        } else {
            Err(StorageError::Unavailable(
                "localStorage is not available".to_string(),
            ))
        }
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        LocalStorage::raw()
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|_| StorageError::QuotaExceeded(key.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        LocalStorage::raw()
            .remove_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
    }
}

/// Browser storage when the page has it; otherwise state lasts until reload.
pub fn open_storage() -> Arc<dyn KeyValueStorage> {
    match BrowserStorage::open() {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            log::warn!("{}; reader state will not be saved", e);
            Arc::new(MemoryStorage::new())
        }
    }
}
