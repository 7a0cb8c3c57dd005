//! Game settings and preferences
//!
//! Persisted as one JSON blob in the same session store as the best distance.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;
use crate::tuning::{ConfigError, Tuning};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Display ===
    /// Upper bound on the on-screen canvas width (CSS pixels)
    pub max_display_width: u32,
    /// Upper bound on the on-screen canvas height (CSS pixels)
    pub max_display_height: u32,

    /// Pause when the window loses focus or the tab is hidden
    pub auto_pause_on_blur: bool,

    /// Gameplay balance
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_display_width: 900,
            max_display_height: 760,
            auto_pause_on_blur: true,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "race_settings";

    /// Parse a (possibly partial) settings blob and validate its tuning
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.tuning.validate()?;
        Ok(settings)
    }

    /// Load settings from the store, falling back to defaults
    pub fn load<K: KeyValueStore + ?Sized>(store: &K) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring stored settings: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unavailable: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to the store; failures are logged
    pub fn save<K: KeyValueStore + ?Sized>(&self, store: &mut K) {
        let result = serde_json::to_string(self)
            .map_err(|e| e.to_string())
            .and_then(|json| store.set(Self::STORAGE_KEY, &json).map_err(|e| e.to_string()));
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Settings not saved: {}", e),
        }
    }
}
