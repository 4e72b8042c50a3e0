//! Build map: the bundles a build produced and where they are packaged

use crate::parameters::BuildParameters;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One built bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildBundleInfo {
    pub bundle_name: String,
    /// Bundle file as written by the build pipeline
    pub package_source_file_path: PathBuf,
    /// Bundle file inside the package directory
    pub package_dest_file_path: PathBuf,
}

/// A bundle entry as listed in a build configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleEntry {
    pub bundle_name: String,
    /// Packaged file name; defaults to the bundle name
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Every bundle of the current build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildMapContext {
    pub collection: Vec<BuildBundleInfo>,
}

impl BuildMapContext {
    pub fn new(collection: Vec<BuildBundleInfo>) -> Self {
        Self { collection }
    }

    /// Resolve configured entries against the build's output directories
    pub fn from_entries(parameters: &BuildParameters, entries: &[BundleEntry]) -> Self {
        let pipeline_dir = parameters.pipeline_output_directory();
        let package_dir = parameters.package_output_directory();

        let collection = entries
            .iter()
            .map(|entry| {
                let file_name = entry.file_name.as_deref().unwrap_or(&entry.bundle_name);
                BuildBundleInfo {
                    bundle_name: entry.bundle_name.clone(),
                    package_source_file_path: pipeline_dir.join(&entry.bundle_name),
                    package_dest_file_path: package_dir.join(file_name),
                }
            })
            .collect();

        Self { collection }
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }
}
