//! Engine configuration.
//!
//! Loaded once from JSON by the host and injected into
//! [`crate::engine::EngineCore::with_config`]. Every field has a default, so
//! an empty object `{}` is a valid configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{GRID_SIZE, MAX_QUICK_SLOTS, SNAP_THRESHOLD_PX};
use crate::error::ConfigError;
use crate::input::{ModifierTier, Tool};

/// A keyboard shortcut that creates a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationBinding {
    /// Tool the binding is limited to; `None` applies under every tool.
    #[serde(default)]
    pub tool: Option<Tool>,
    #[serde(default)]
    pub tier: ModifierTier,
    /// Physical key code, e.g. `"KeyT"`.
    pub code: String,
    /// Node kind to create.
    pub kind: String,
}

impl CreationBinding {
    #[must_use]
    pub fn new(tier: ModifierTier, code: &str, kind: &str) -> Self {
        Self { tool: None, tier, code: code.to_owned(), kind: kind.to_owned() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Snap dragged and resized coordinates to the grid.
    pub grid_snap: bool,
    /// Grid unit in world coordinates.
    pub grid_size: f64,
    /// Show smart guides for single-node drags without holding Shift.
    pub smart_guides: bool,
    /// Guide match distance in screen pixels.
    pub snap_threshold_px: f64,
    /// Delete without a confirmation step.
    pub instant_delete: bool,
    /// Node kinds for `Digit1`..`Digit9`; `None` leaves a slot empty.
    pub quick_slots: Vec<Option<String>>,
    pub creation_bindings: Vec<CreationBinding>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_snap: false,
            grid_size: GRID_SIZE,
            smart_guides: true,
            snap_threshold_px: SNAP_THRESHOLD_PX,
            instant_delete: false,
            quick_slots: Vec::new(),
            creation_bindings: default_creation_bindings(),
        }
    }
}

fn default_creation_bindings() -> Vec<CreationBinding> {
    use ModifierTier::{CtrlShift, Plain, Shift};

    vec![
        CreationBinding::new(Plain, "KeyT", "text"),
        CreationBinding::new(Plain, "KeyP", "prompt"),
        CreationBinding::new(Plain, "KeyI", "image"),
        CreationBinding::new(Plain, "KeyV", "video"),
        CreationBinding::new(Plain, "KeyU", "audio"),
        CreationBinding::new(Shift, "KeyI", "image-editor"),
        CreationBinding::new(Shift, "KeyT", "character"),
        CreationBinding::new(CtrlShift, "KeyR", "reroute"),
    ]
}

/// Whether `code` looks like a `KeyboardEvent.code` value (`KeyA`, `Digit1`, `F5`, `Slash`).
fn is_key_code(code: &str) -> bool {
    code.starts_with(|c: char| c.is_ascii_uppercase()) && code.chars().all(|c| c.is_ascii_alphanumeric())
}

impl EngineConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.grid_size.is_finite() || self.grid_size <= 0.0 {
            return Err(ConfigError::InvalidGridSize(self.grid_size));
        }
        if !self.snap_threshold_px.is_finite() || self.snap_threshold_px < 0.0 {
            return Err(ConfigError::InvalidSnapThreshold(self.snap_threshold_px));
        }
        if self.quick_slots.len() > MAX_QUICK_SLOTS {
            return Err(ConfigError::TooManyQuickSlots { count: self.quick_slots.len(), max: MAX_QUICK_SLOTS });
        }
        if let Some(bad) = self.creation_bindings.iter().find(|b| !is_key_code(&b.code)) {
            return Err(ConfigError::InvalidKeyCode(bad.code.clone()));
        }
        Ok(())
    }

    /// Guide threshold in world units at `zoom`.
    #[must_use]
    pub fn snap_threshold_world(&self, zoom: f64) -> f64 {
        if zoom > 0.0 && zoom.is_finite() { self.snap_threshold_px / zoom } else { self.snap_threshold_px }
    }

    /// Node kind in quick slot `index` (0-based), if configured.
    #[must_use]
    pub fn quick_slot(&self, index: usize) -> Option<&str> {
        self.quick_slots.get(index)?.as_deref()
    }

    /// Node kind bound to `code` at `tier` under `tool`.
    ///
    /// Bindings scoped to `tool` take precedence over tool-independent ones.
    #[must_use]
    pub fn creation_kind(&self, tool: Tool, tier: ModifierTier, code: &str) -> Option<&str> {
        let matches = |b: &&CreationBinding| b.tier == tier && b.code == code;
        self.creation_bindings
            .iter()
            .filter(matches)
            .find(|b| b.tool == Some(tool))
            .or_else(|| self.creation_bindings.iter().filter(matches).find(|b| b.tool.is_none()))
            .map(|b| b.kind.as_str())
    }
}
