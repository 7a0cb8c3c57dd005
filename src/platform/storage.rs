//! Browser sessionStorage backend

use web_sys::Storage;

use crate::persistence::{KeyValueStore, StorageError};

/// `KeyValueStore` over `window.sessionStorage`
///
/// Storage can be missing (privacy modes, sandboxed frames); every operation
/// then reports `Unavailable` and the game carries on without persistence.
pub struct SessionStore {
    storage: Option<Storage>,
}

impl SessionStore {
    pub fn open(window: &web_sys::Window) -> Self {
        let storage = window.session_storage().ok().flatten();
        if storage.is_none() {
            log::warn!("sessionStorage unavailable; best distance will not persist");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StorageError> {
        self.storage.as_ref().ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStore for SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?.get_item(key).map_err(|e| StorageError::Read {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?.set_item(key, value).map_err(|e| StorageError::Write {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }
}
