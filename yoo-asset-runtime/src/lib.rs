//! YooAsset Runtime
//!
//! Poll-driven load operations. A [`LoadOperation`] resolves its owning
//! bundle, asks the host to load the asset, validates what comes back and
//! notifies listeners exactly once. [`OperationSystem`] ticks many of them
//! per frame and [`ResourceManager`] issues and shares them.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use yoo_asset_core::{AssetInfo, LoadStatus, ProviderKind, SceneMode};
//! use yoo_asset_runtime::LoadOperation;
//! use yoo_asset_runtime::simulation::{AssetDatabase, SimulatedBundle};
//!
//! let database = Arc::new(AssetDatabase::default_editor());
//! database.insert_scene("Assets/Scenes/Main.unity", 2);
//!
//! let mut op = LoadOperation::new(
//!     AssetInfo::new("Assets/Scenes/Main.unity"),
//!     ProviderKind::scene(SceneMode::Single),
//!     Arc::new(SimulatedBundle::ready("scenes")),
//!     database.clone(),
//! );
//!
//! while !op.is_done() {
//!     database.step();
//!     op.tick();
//! }
//! assert_eq!(op.status(), LoadStatus::Succeeded);
//! ```

pub mod manager;
pub mod notifier;
pub mod operation;
pub mod scheduler;
pub mod simulation;

#[cfg(feature = "async")]
pub mod drive;

// Re-export main types
pub use manager::{BundleResolver, ResourceManager};
pub use notifier::{CompletionNotifier, ListenerId};
pub use operation::{LoadOperation, LoadOutcome};
pub use scheduler::{OperationId, OperationSystem, UpdateReport};
