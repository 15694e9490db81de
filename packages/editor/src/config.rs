use crate::errors::EditorError;
use pagecraft_core::{GridConfig, Viewport};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of undo levels (0 = unlimited)
    #[serde(default)]
    pub history_limit: usize,

    /// Viewport the canvas opens in
    #[serde(default)]
    pub default_viewport: Viewport,

    #[serde(default)]
    pub drag: DragConfig,

    #[serde(default)]
    pub grid: GridConfig,
}

/// Gesture activation thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragConfig {
    /// Pointer movement in px before a pointer drag starts
    #[serde(default = "default_activation_distance")]
    pub activation_distance: f64,

    /// Hold time in ms before a touch drag starts
    #[serde(default = "default_touch_delay_ms")]
    pub touch_delay_ms: u64,

    /// Movement in px a touch hold may drift before it counts as a scroll
    #[serde(default = "default_touch_tolerance")]
    pub touch_tolerance: f64,
}

fn default_activation_distance() -> f64 {
    3.0
}

fn default_touch_delay_ms() -> u64 {
    250
}

fn default_touch_tolerance() -> f64 {
    5.0
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            activation_distance: default_activation_distance(),
            touch_delay_ms: default_touch_delay_ms(),
            touch_tolerance: default_touch_tolerance(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: 0,
            default_viewport: Viewport::Desktop,
            drag: DragConfig::default(),
            grid: GridConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults when the file
    /// is absent
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EditorError> {
        let drag = &self.drag;
        if !(drag.activation_distance.is_finite() && drag.activation_distance >= 0.0) {
            return Err(EditorError::Config(format!(
                "drag.activationDistance must be a non-negative number, got {}",
                drag.activation_distance
            )));
        }
        if !(drag.touch_tolerance.is_finite() && drag.touch_tolerance >= 0.0) {
            return Err(EditorError::Config(format!(
                "drag.touchTolerance must be a non-negative number, got {}",
                drag.touch_tolerance
            )));
        }
        if !(self.grid.size.is_finite() && self.grid.size > 0.0) {
            return Err(EditorError::Config(format!(
                "grid.size must be positive, got {}",
                self.grid.size
            )));
        }
        Ok(())
    }
}
