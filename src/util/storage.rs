//! Durable key/value storage behind the session store and chat state.
//!
//! SYSTEM CONTEXT
//! ==============
//! In the browser this is `localStorage`. SSR builds get a storage that reads
//! nothing and accepts every write, so server rendering stays deterministic
//! and hydration happens client-side. Tests use `MemoryStorage`.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The browser refused access (private mode, quota, disabled storage).
    #[error("storage unavailable")]
    Unavailable,

    #[error("storage write failed: {0}")]
    Write(String),

    #[error("storage encode failed: {0}")]
    Encode(String),
}

/// String key/value store with `localStorage` semantics.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns a `StorageError` when the value could not be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns a `StorageError` when the key could not be removed.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Drop every key.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` when storage could not be cleared.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Serialize `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns `StorageError::Encode` or the underlying write error.
pub fn save_json<S, T>(storage: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    S: KeyValueStorage + ?Sized,
    T: Serialize,
{
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Encode(e.to_string()))?;
    storage.set_item(key, &raw)
}

/// `window.localStorage` in the browser; inert elsewhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(feature = "hydrate")]
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(StorageError::Unavailable)
}

impl KeyValueStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            local_storage().ok()?.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            None
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?
                .set_item(key, value)
                .map_err(|e| StorageError::Write(format!("{e:?}")))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
            Ok(())
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?
                .remove_item(key)
                .map_err(|e| StorageError::Write(format!("{e:?}")))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Ok(())
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?.clear().map_err(|e| StorageError::Write(format!("{e:?}")))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Ok(())
        }
    }
}

/// Process-local storage, shareable between clones.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
    read_only: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that keeps its current contents and rejects every write.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    fn write<F>(&self, f: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut HashMap<String, String>),
    {
        if self.read_only {
            return Err(StorageError::Unavailable);
        }
        let mut items = self
            .items
            .lock()
            .map_err(|_| StorageError::Write("memory storage lock poisoned".to_owned()))?;
        f(&mut items);
        Ok(())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write(|items| {
            items.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.write(|items| {
            items.remove(key);
        })
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.write(HashMap::clear)
    }
}
