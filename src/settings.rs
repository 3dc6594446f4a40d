//! Minigame settings
//!
//! The outcome table and pose tuning. Defaults reproduce the shipped game;
//! an override can be stored as JSON in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::sim::{ConfigError, Outcome, OutcomeTable};

/// Pose offsets and delays that shape a throw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrowTuning {
    /// Peak of the flight (pixels, negative is up)
    pub flight_height: f32,
    /// Where an upside-down landing rests, on the fingertips
    pub perch_height: f32,
    /// How far the hand dips when poked
    pub hand_recoil: f32,
    /// Extra rotation for a fallen landing (lands on its side)
    pub fallen_spin_offset: f32,
    /// Sideways slide after a fallen impact
    pub settle_offset: f32,
    /// How long the result stays on screen (seconds)
    pub dwell_secs: f32,
    /// Vertical offset beyond which the actor counts as on the ground
    pub ground_threshold: f32,
}

impl Default for ThrowTuning {
    fn default() -> Self {
        Self {
            flight_height: -150.0,
            perch_height: -40.0,
            hand_recoil: 4.0,
            fallen_spin_offset: 90.0,
            settle_offset: 10.0,
            dwell_secs: 1.2,
            ground_threshold: 100.0,
        }
    }
}

/// Minigame configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Settings {
    /// Landing outcomes, validated on load
    pub outcomes: OutcomeTable,
    pub tuning: ThrowTuning,
}

/// Settings as stored, before the outcome table is validated
#[derive(Deserialize)]
struct StoredSettings {
    #[serde(default)]
    outcomes: Option<Vec<Outcome>>,
    #[serde(default)]
    tuning: ThrowTuning,
}

impl Settings {
    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let stored: StoredSettings = serde_json::from_str(json)?;
        let outcomes = match stored.outcomes {
            Some(outcomes) => OutcomeTable::new(outcomes)?,
            None => OutcomeTable::default(),
        };
        Ok(Self {
            outcomes,
            tuning: stored.tuning,
        })
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "firey_roulette_settings";

    /// Load settings override from LocalStorage (WASM only)
    ///
    /// No stored override gives the defaults. A stored override that does
    /// not parse or validate is an error.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Result<Self, ConfigError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                let settings = Self::from_json(&json)?;
                log::info!("Loaded roulette settings from LocalStorage");
                return Ok(settings);
            }
        }

        log::info!("Using default roulette settings");
        Ok(Self::default())
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::default())
    }
}
