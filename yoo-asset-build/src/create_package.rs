//! Create-package task
//!
//! Copies the pipeline manifest files and every built bundle from the
//! pipeline output directory into the versioned package directory.

use crate::build_map::BuildMapContext;
use crate::context::BuildContext;
use crate::parameters::BuildParameters;
use crate::progress::{NoProgress, ProgressReporter};
use crate::task::BuildTask;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info};
use yoo_asset_core::{MANIFEST_FILE_EXTENSION, OUTPUT_FOLDER_NAME, Result, YooAssetError};

const PROGRESS_TITLE: &str = "Copying package files";

/// Copy `source` to `dest`, creating parent directories. Without
/// `overwrite`, an existing destination is an error.
pub fn copy_file(source: &Path, dest: &Path, overwrite: bool) -> Result<()> {
    if !overwrite && dest.exists() {
        return Err(YooAssetError::copy_file(
            source,
            dest,
            io::Error::new(io::ErrorKind::AlreadyExists, "destination exists"),
        ));
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| YooAssetError::copy_file(source, dest, e))?;
    }
    fs::copy(source, dest).map_err(|e| YooAssetError::copy_file(source, dest, e))?;
    Ok(())
}

/// Build task that assembles the package directory
pub struct TaskCreatePackage {
    progress: Box<dyn ProgressReporter>,
}

impl TaskCreatePackage {
    pub fn new() -> Self {
        Self {
            progress: Box::new(NoProgress),
        }
    }

    pub fn with_progress<P: ProgressReporter + 'static>(mut self, progress: P) -> Self {
        self.progress = Box::new(progress);
        self
    }

    fn copy_package_files(
        &self,
        parameters: &BuildParameters,
        build_map: &BuildMapContext,
    ) -> Result<()> {
        let pipeline_dir = parameters.pipeline_output_directory();
        let package_dir = parameters.package_output_directory();
        info!("Copying package files to {}", package_dir.display());

        // Serialized manifest, then its text form
        let manifest_text = format!("{}.{}", OUTPUT_FOLDER_NAME, MANIFEST_FILE_EXTENSION);
        for file_name in [OUTPUT_FOLDER_NAME, manifest_text.as_str()] {
            copy_file(
                &pipeline_dir.join(file_name),
                &package_dir.join(file_name),
                true,
            )?;
        }

        let total = build_map.len();
        let result: Result<()> = build_map
            .collection
            .iter()
            .enumerate()
            .try_for_each(|(index, bundle)| {
                debug!("Copying bundle {}", bundle.bundle_name);
                copy_file(
                    &bundle.package_source_file_path,
                    &bundle.package_dest_file_path,
                    true,
                )?;
                self.progress.report(PROGRESS_TITLE, index + 1, total);
                Ok(())
            });
        self.progress.finish();
        result?;

        info!("Copied {} bundles", total);
        Ok(())
    }
}

impl Default for TaskCreatePackage {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildTask for TaskCreatePackage {
    fn name(&self) -> &str {
        "CreatePackage"
    }

    fn run(&self, context: &mut BuildContext) -> Result<()> {
        let parameters = context.get_context_object::<BuildParameters>()?;
        let build_map = context.get_context_object::<BuildMapContext>()?;

        if !parameters.build_mode.writes_bundles() {
            info!(
                "Skipping package creation in {:?} mode",
                parameters.build_mode
            );
            return Ok(());
        }

        self.copy_package_files(parameters, build_map)
    }
}
