//! YAML build configuration

use crate::build_map::{BuildMapContext, BundleEntry};
use crate::context::BuildContext;
use crate::parameters::BuildParameters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use yoo_asset_core::Result;

/// Build parameters plus the bundles the build produced
///
/// ```yaml
/// parameters:
///   package_name: DefaultPackage
///   package_version: "2024-05-01"
///   build_mode: ForceRebuild
///   build_output_root: Bundles
///   build_target: Android
/// bundles:
///   - bundle_name: ui.bundle
///   - bundle_name: scenes.bundle
///     file_name: 9b1e4d.bundle
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub parameters: BuildParameters,
    #[serde(default)]
    pub bundles: Vec<BundleEntry>,
}

impl BuildConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: BuildConfig = serde_yaml::from_str(yaml)?;
        config.parameters.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading build config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// A context holding the parameters and the resolved build map
    pub fn into_context(self) -> BuildContext {
        let build_map = BuildMapContext::from_entries(&self.parameters, &self.bundles);
        let mut context = BuildContext::new();
        context.set_context_object(self.parameters);
        context.set_context_object(build_map);
        context
    }
}
