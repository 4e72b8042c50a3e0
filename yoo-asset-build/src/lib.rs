//! YooAsset Build
//!
//! Build pipeline tasks that turn the raw output of a bundle build into a
//! versioned package directory.
//!
//! # Examples
//!
//! ```rust,no_run
//! use yoo_asset_build::{BuildConfig, BuildPipeline, TaskCreatePackage};
//!
//! let mut context = BuildConfig::load("build.yaml")?.into_context();
//! BuildPipeline::new()
//!     .with_task(TaskCreatePackage::new())
//!     .run(&mut context)?;
//!
//! # Ok::<(), yoo_asset_core::YooAssetError>(())
//! ```

pub mod build_map;
pub mod config;
pub mod context;
pub mod create_package;
pub mod parameters;
pub mod progress;
pub mod task;

// Re-export main types
pub use build_map::{BuildBundleInfo, BuildMapContext, BundleEntry};
pub use config::BuildConfig;
pub use context::BuildContext;
pub use create_package::{TaskCreatePackage, copy_file};
pub use parameters::{BuildMode, BuildParameters};
pub use progress::{NoProgress, ProgressReporter};
pub use task::{BuildPipeline, BuildTask};
