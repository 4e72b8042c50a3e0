//! YooAsset Core
//!
//! Core data structures and host traits for asset bundle loading.
//! This crate provides the building blocks shared by the runtime loader
//! and the build pipeline: load status, asset identity, error types and
//! the collaborator traits that stand in for the host engine.

pub mod asset_info;
pub mod constants;
pub mod error;
pub mod host;
pub mod provider_kind;
pub mod settings;
pub mod status;

// Re-export main types
pub use asset_info::{AssetInfo, ProviderPriority};
pub use constants::*;
pub use error::{LoadError, LoadErrorKind, Result, ValidationFailure, YooAssetError};
pub use host::{
    AssetObject, DependencyHandle, LoadFacility, LoadRejected, LoadRequest, LoadedObject,
    PendingLoad, SceneObject,
};
pub use provider_kind::{ProviderKind, SceneMode};
pub use settings::{PlayMode, RuntimeSettings};
pub use status::LoadStatus;
