//! Engine settings
//!
//! Loaded from a JSON file by the host; every field has a default so partial
//! files are accepted.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::difficulty::Tier;
use crate::sim::state::Viewport;

/// Engine settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Initial viewport size (pixels)
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Performance ===
    /// Throttle spawns, shrink entity caps, drop decorations
    pub reduced_effects: bool,

    // === Input ===
    /// Holding jump repeats ground jumps
    pub auto_repeat_jump: bool,

    // === Debug ===
    /// Obstacles never end the run
    pub invincible: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            reduced_effects: false,
            auto_repeat_jump: true,
            invincible: false,
        }
    }
}

impl Settings {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }

    /// Reduced effects as actually applied (forced on from Hell upward)
    pub fn effective_reduced_effects(&self, difficulty_index: usize) -> bool {
        self.reduced_effects || Tier::of(difficulty_index).forces_reduced_effects()
    }

    /// Reject viewports that cannot hold the ground strip and the character
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_viewport(self.viewport_width, self.viewport_height)
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json).map_err(SettingsError::Parse)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

pub(crate) fn validate_viewport(width: f32, height: f32) -> Result<(), SettingsError> {
    let usable = width.is_finite()
        && height.is_finite()
        && width > 0.0
        && height >= GROUND_HEIGHT + CHARACTER_SIZE;
    if usable {
        Ok(())
    } else {
        Err(SettingsError::InvalidViewport { width, height })
    }
}
