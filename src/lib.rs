//! YooAsset
//!
//! Asset bundle management: poll-driven runtime load operations and build
//! pipeline tasks that package built bundles.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use yoo_asset::simulation::{AssetDatabase, SimulatedBundle};
//! use yoo_asset::{
//!     AssetInfo, DependencyHandle, LoadStatus, ResourceManager, RuntimeSettings, SceneMode,
//! };
//!
//! let database = Arc::new(AssetDatabase::default_editor());
//! database.insert_scene("Assets/Scenes/Main.unity", 3);
//!
//! let bundle: Arc<dyn DependencyHandle> = Arc::new(SimulatedBundle::ready("scenes"));
//! let mut manager = ResourceManager::new(
//!     RuntimeSettings::default(),
//!     database.clone(),
//!     move |_: &AssetInfo| bundle.clone(),
//! );
//!
//! let scene = AssetInfo::new("Assets/Scenes/Main.unity");
//! let id = manager.load_scene(scene, SceneMode::Single, false, None);
//! while !manager.is_idle() {
//!     database.step();
//!     manager.update();
//! }
//! let status = manager.operation(id).map(|op| op.status());
//! assert_eq!(status, Some(LoadStatus::Succeeded));
//! ```

// Re-export from core, runtime and build crates
pub use yoo_asset_core::{
    AssetInfo, AssetObject, DependencyHandle, LoadError, LoadErrorKind, LoadFacility,
    LoadRejected, LoadRequest, LoadStatus, LoadedObject, PendingLoad, PlayMode, ProviderKind,
    ProviderPriority, Result, RuntimeSettings, SceneMode, SceneObject, ValidationFailure,
    YooAssetError, constants::*,
};

pub use yoo_asset_runtime::{
    BundleResolver, CompletionNotifier, ListenerId, LoadOperation, LoadOutcome, OperationId,
    OperationSystem, ResourceManager, UpdateReport, simulation,
};

#[cfg(feature = "async")]
pub use yoo_asset_runtime::drive;

pub use yoo_asset_build::{
    BuildBundleInfo, BuildConfig, BuildContext, BuildMapContext, BuildMode, BuildParameters,
    BuildPipeline, BuildTask, BundleEntry, NoProgress, ProgressReporter, TaskCreatePackage,
};
