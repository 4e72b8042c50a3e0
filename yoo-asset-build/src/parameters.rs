//! Build parameters

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use yoo_asset_core::{OUTPUT_FOLDER_NAME, Result, YooAssetError};

/// How the bundle build runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildMode {
    /// Rebuild everything from scratch
    ForceRebuild,
    /// Only rebuild bundles whose inputs changed
    #[default]
    IncrementalBuild,
    /// Run the pipeline without writing bundles
    DryRunBuild,
    /// Produce a manifest for editor simulation, no bundles
    SimulateBuild,
}

impl BuildMode {
    /// Whether this mode produces bundle files on disk
    pub fn writes_bundles(self) -> bool {
        !matches!(self, BuildMode::DryRunBuild | BuildMode::SimulateBuild)
    }
}

/// Parameters shared by every build task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildParameters {
    pub package_name: String,
    pub package_version: String,
    #[serde(default)]
    pub build_mode: BuildMode,
    /// Root of all build output
    pub build_output_root: PathBuf,
    /// Target platform name, e.g. `StandaloneWindows64`
    pub build_target: String,
}

impl BuildParameters {
    /// Check the parameters before any task runs
    pub fn validate(&self) -> Result<()> {
        if self.package_name.trim().is_empty() {
            return Err(YooAssetError::invalid_parameter(
                "package_name",
                "must not be empty",
            ));
        }
        if self.package_version.trim().is_empty() {
            return Err(YooAssetError::invalid_parameter(
                "package_version",
                "must not be empty",
            ));
        }
        if self.build_target.trim().is_empty() {
            return Err(YooAssetError::invalid_parameter(
                "build_target",
                "must not be empty",
            ));
        }
        Ok(())
    }

    fn package_root(&self) -> PathBuf {
        self.build_output_root
            .join(&self.build_target)
            .join(&self.package_name)
    }

    /// Where the bundle build pipeline wrote its raw output
    pub fn pipeline_output_directory(&self) -> PathBuf {
        self.package_root().join(OUTPUT_FOLDER_NAME)
    }

    /// Where the versioned package is assembled
    pub fn package_output_directory(&self) -> PathBuf {
        self.package_root().join(&self.package_version)
    }
}
