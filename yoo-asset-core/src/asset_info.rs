//! Asset identity and request priority

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Identifies the asset a load request targets
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetInfo {
    /// Project-relative asset path, e.g. `Assets/Scenes/Main.unity`
    pub asset_path: String,
    /// Optional stable GUID assigned by the asset database
    #[serde(default)]
    pub asset_guid: Option<String>,
}

impl AssetInfo {
    pub fn new<S: Into<String>>(asset_path: S) -> Self {
        Self {
            asset_path: asset_path.into(),
            asset_guid: None,
        }
    }

    /// File name without extension. Scenes are addressed by this name.
    pub fn asset_name(&self) -> &str {
        Path::new(&self.asset_path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.asset_path)
    }
}

impl fmt::Display for AssetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.asset_path)
    }
}

/// Ordering hint handed to the host scheduler.
///
/// Higher values are serviced first where the host honours priorities at
/// all. It never changes the transition order of an operation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProviderPriority(pub u32);

impl ProviderPriority {
    pub const LOWEST: ProviderPriority = ProviderPriority(0);

    pub fn value(self) -> u32 {
        self.0
    }

    /// Priority as the signed integer host facilities expect
    pub fn as_host_priority(self) -> i32 {
        i32::try_from(self.0).unwrap_or(i32::MAX)
    }
}

impl From<u32> for ProviderPriority {
    fn from(value: u32) -> Self {
        ProviderPriority(value)
    }
}
