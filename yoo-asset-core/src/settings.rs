//! Runtime settings
//!
//! Resolved once at startup and handed to the operation system. The play
//! mode doubles as the capability flag for editor-only providers, which
//! replaces scattered editor checks at every call site.

use crate::asset_info::ProviderPriority;
use crate::constants::DEFAULT_MAX_TIME_SLICE_MS;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Where assets are loaded from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayMode {
    /// Load straight from the editor asset database, no bundles built
    #[default]
    EditorSimulate,
    /// Load from bundles shipped with the application
    Offline,
    /// Load from bundles, downloading from a remote host when needed
    Host,
}

impl PlayMode {
    /// Whether providers backed by the editor asset database may run
    pub fn supports_database_loads(self) -> bool {
        matches!(self, PlayMode::EditorSimulate)
    }
}

/// Settings consumed by the runtime loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    pub play_mode: PlayMode,
    /// Upper bound on time spent ticking operations per update, in
    /// milliseconds. `0` disables the bound.
    pub max_time_slice_ms: u64,
    /// Priority used when a request does not name one
    pub default_priority: ProviderPriority,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            play_mode: PlayMode::default(),
            max_time_slice_ms: DEFAULT_MAX_TIME_SLICE_MS,
            default_priority: ProviderPriority::LOWEST,
        }
    }
}

impl RuntimeSettings {
    /// Parse settings from YAML; missing keys fall back to defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load settings from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading runtime settings from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// The time slice as a duration, `None` when unbounded
    pub fn max_time_slice(&self) -> Option<Duration> {
        if self.max_time_slice_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.max_time_slice_ms))
        }
    }
}
