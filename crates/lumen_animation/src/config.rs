//! Engine configuration
//!
//! Loaded from TOML by the owning application, e.g.
//!
//! ```toml
//! global_speed = 1.0
//! default_group = "default"
//! default_priority = "normal"
//! replace_same_name = true
//! event_capacity = 256
//! ```

use serde::{Deserialize, Serialize};

use crate::engine::AnimationPriority;
use crate::error::{AnimationError, Result};

/// Defaults applied by an [`AnimationEngine`](crate::AnimationEngine)
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Multiplier applied to every `update` delta (clamped to >= 0)
    pub global_speed: f64,
    /// Group used when `play` is not given one
    pub default_group: String,
    /// Priority used when `play` is not given one
    pub default_priority: AnimationPriority,
    /// Whether `play` replaces an existing animation with the same name
    /// (otherwise the new one gets a numeric suffix)
    pub replace_same_name: bool,
    /// Lifecycle events kept between drains; the oldest are dropped first
    /// and 0 disables recording
    pub event_capacity: usize,
}

pub const DEFAULT_GROUP: &str = "default";
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            global_speed: 1.0,
            default_group: DEFAULT_GROUP.to_string(),
            default_priority: AnimationPriority::Normal,
            replace_same_name: true,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from TOML; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AnimationError::InvalidConfig(e.to_string()))
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AnimationError::InvalidConfig(e.to_string()))
    }
}
