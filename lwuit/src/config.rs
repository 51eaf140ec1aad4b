//! Toolkit configuration.
//!
//! Defaults that would otherwise be global statics (motion style, transition
//! speed, table track sizes, scrollbar thickness) live in [`ToolkitConfig`],
//! which is handed to the constructors that need it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::motion::MotionStyle;

/// Toolkit-wide defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Interpolation curve used by slide transitions.
    pub motion: MotionStyle,
    /// Duration of a transition in milliseconds.
    pub transition_duration_ms: u64,
    /// Right-to-left mode for new containers and transitions.
    pub rtl: bool,
    /// Whether the platform composites alpha natively. When false, fades
    /// blend pixels manually.
    pub native_alpha: bool,
    /// Pixels reserved for a scrollbar on scrollable containers.
    pub scrollbar_thickness: i32,
    /// Defaults for table layouts.
    pub table: TableDefaults,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            motion: MotionStyle::Spline,
            transition_duration_ms: 300,
            rtl: false,
            native_alpha: true,
            scrollbar_thickness: 0,
            table: TableDefaults::default(),
        }
    }
}

impl ToolkitConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        tracing::debug!(?path, "loaded toolkit config");
        Ok(config)
    }

    /// Transition duration as a [`std::time::Duration`].
    pub fn transition_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.transition_duration_ms)
    }
}

/// Track sizes a table falls back to when a column or row has no sizing
/// cell of its own, as a percentage of the available space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableDefaults {
    pub column_width_percent: Option<u8>,
    pub row_height_percent: Option<u8>,
}
