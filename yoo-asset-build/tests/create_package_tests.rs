//! Create-package task tests against a real directory tree

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use yoo_asset_build::{
    BuildConfig, BuildContext, BuildMapContext, BuildMode, BuildParameters, BuildPipeline,
    BuildTask, BundleEntry, TaskCreatePackage,
};
use yoo_asset_core::{OUTPUT_FOLDER_NAME, YooAssetError};

fn parameters(root: &Path, mode: BuildMode) -> BuildParameters {
    BuildParameters {
        package_name: "DefaultPackage".to_string(),
        package_version: "1.0.0".to_string(),
        build_mode: mode,
        build_output_root: root.to_path_buf(),
        build_target: "StandaloneLinux64".to_string(),
    }
}

fn entries() -> Vec<BundleEntry> {
    vec![
        BundleEntry {
            bundle_name: "ui.bundle".to_string(),
            file_name: None,
        },
        BundleEntry {
            bundle_name: "scenes.bundle".to_string(),
            file_name: Some("c0ffee.bundle".to_string()),
        },
    ]
}

/// Lay out what a bundle build would have written
fn write_pipeline_output(parameters: &BuildParameters) -> anyhow::Result<()> {
    let dir = parameters.pipeline_output_directory();
    fs::create_dir_all(&dir)?;
    fs::write(dir.join(OUTPUT_FOLDER_NAME), b"binary manifest")?;
    fs::write(dir.join(format!("{}.manifest", OUTPUT_FOLDER_NAME)), b"text manifest")?;
    fs::write(dir.join("ui.bundle"), b"ui")?;
    fs::write(dir.join("scenes.bundle"), b"scenes")?;
    Ok(())
}

fn context_for(parameters: BuildParameters) -> BuildContext {
    BuildConfig {
        parameters,
        bundles: entries(),
    }
    .into_context()
}

#[test]
fn test_copies_manifests_and_bundles() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    let params = parameters(root.path(), BuildMode::ForceRebuild);
    write_pipeline_output(&params)?;
    let package_dir = params.package_output_directory();

    let mut context = context_for(params);
    BuildPipeline::new()
        .with_task(TaskCreatePackage::new())
        .run(&mut context)?;

    assert_eq!(fs::read(package_dir.join(OUTPUT_FOLDER_NAME))?, b"binary manifest");
    assert_eq!(
        fs::read(package_dir.join(format!("{}.manifest", OUTPUT_FOLDER_NAME)))?,
        b"text manifest"
    );
    assert_eq!(fs::read(package_dir.join("ui.bundle"))?, b"ui");
    assert_eq!(fs::read(package_dir.join("c0ffee.bundle"))?, b"scenes");
    assert!(!package_dir.join("scenes.bundle").exists());
    Ok(())
}

#[test]
fn test_overwrites_previous_package() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    let params = parameters(root.path(), BuildMode::IncrementalBuild);
    write_pipeline_output(&params)?;
    let package_dir = params.package_output_directory();
    fs::create_dir_all(&package_dir)?;
    fs::write(package_dir.join("ui.bundle"), b"stale")?;

    let mut context = context_for(params);
    TaskCreatePackage::new().run(&mut context)?;

    assert_eq!(fs::read(package_dir.join("ui.bundle"))?, b"ui");
    Ok(())
}

#[test]
fn test_dry_run_and_simulate_skip_copy() -> anyhow::Result<()> {
    for mode in [BuildMode::DryRunBuild, BuildMode::SimulateBuild] {
        let root = tempfile::tempdir()?;
        let params = parameters(root.path(), mode);
        let package_dir = params.package_output_directory();

        // Nothing on disk: a copy attempt would fail
        let mut context = context_for(params);
        TaskCreatePackage::new().run(&mut context)?;
        assert!(!package_dir.exists());
    }
    Ok(())
}

#[test]
fn test_missing_bundle_aborts() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    let params = parameters(root.path(), BuildMode::ForceRebuild);
    write_pipeline_output(&params)?;
    fs::remove_file(params.pipeline_output_directory().join("scenes.bundle"))?;

    let mut context = context_for(params);
    let err = TaskCreatePackage::new().run(&mut context).unwrap_err();
    match err {
        YooAssetError::CopyFile { from, .. } => assert!(from.ends_with("scenes.bundle")),
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[test]
fn test_progress_reported_per_bundle() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    let params = parameters(root.path(), BuildMode::ForceRebuild);
    write_pipeline_output(&params)?;

    let reports = Arc::new(Mutex::new(Vec::new()));
    let sink = reports.clone();
    let task = TaskCreatePackage::new().with_progress(move |_: &str, current: usize, total: usize| {
        sink.lock().unwrap().push((current, total));
    });

    let mut context = context_for(params);
    task.run(&mut context)?;
    assert_eq!(*reports.lock().unwrap(), vec![(1, 2), (2, 2)]);
    Ok(())
}

#[test]
fn test_empty_build_map_copies_manifests_only() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    let params = parameters(root.path(), BuildMode::ForceRebuild);
    write_pipeline_output(&params)?;
    let package_dir = params.package_output_directory();

    let mut context = BuildContext::new();
    context.set_context_object(params);
    context.set_context_object(BuildMapContext::default());
    TaskCreatePackage::new().run(&mut context)?;

    assert!(package_dir.join(OUTPUT_FOLDER_NAME).exists());
    assert!(!package_dir.join("ui.bundle").exists());
    Ok(())
}
