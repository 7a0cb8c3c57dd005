//! Session-scoped key-value persistence
//!
//! The only value the game persists is the best distance under `race_best`.
//! Storage is best-effort: read failures and garbage fall back to zero,
//! write failures are logged and dropped.

use std::collections::HashMap;

use thiserror::Error;

/// Storage key for the best distance (meters, decimal string)
pub const BEST_KEY: &str = "race_best";

/// Storage failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("failed to read `{key}`: {reason}")]
    Read { key: String, reason: String },
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
}

/// A string key-value store (sessionStorage on web)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Parse a stored best distance; anything unusable reads as absent
pub fn parse_best(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Read the best distance, defaulting to zero
pub fn load_best<K: KeyValueStore + ?Sized>(store: &K) -> f64 {
    match store.get(BEST_KEY) {
        Ok(Some(raw)) => parse_best(&raw).unwrap_or_else(|| {
            log::warn!("Ignoring unparsable best distance {:?}", raw);
            0.0
        }),
        Ok(None) => 0.0,
        Err(e) => {
            log::warn!("Best distance unavailable: {}", e);
            0.0
        }
    }
}

/// Store a new best distance; failures never reach gameplay
pub fn save_best<K: KeyValueStore + ?Sized>(store: &mut K, meters: f64) {
    if let Err(e) = store.set(BEST_KEY, &meters.to_string()) {
        log::warn!("Best distance not saved: {}", e);
    }
}
