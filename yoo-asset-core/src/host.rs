//! Host collaborator traits
//!
//! The loader never talks to an engine directly. Bundles, the loading
//! facility and in-flight load jobs are reached through these traits so a
//! host (or a simulation) can supply whatever async primitive it has, as
//! long as the readiness/progress/force-complete contract holds.

use crate::asset_info::{AssetInfo, ProviderPriority};
use crate::provider_kind::ProviderKind;
use thiserror::Error;

/// An already-requested backing resource (usually a bundle) that a load
/// depends on. Shared by every operation that loads from the same bundle,
/// so all methods take `&self`.
pub trait DependencyHandle: Send + Sync {
    /// The dependency finished successfully
    fn is_ready(&self) -> bool;

    /// The dependency finished with an error
    fn is_failed(&self) -> bool;

    /// Error text of a failed dependency; empty otherwise
    fn error_message(&self) -> String;

    /// Block until the dependency reaches a finished state. Must be
    /// idempotent: several operations may ask for it in the same turn.
    fn force_synchronous_completion(&self);

    /// Whether the dependency is finished either way
    fn is_done(&self) -> bool {
        self.is_ready() || self.is_failed()
    }
}

/// A single in-flight load job created by a [`LoadFacility`]
pub trait PendingLoad: Send {
    /// Progress in `[0, 1]`
    fn progress(&self) -> f32;

    /// The job finished, successfully or not
    fn is_done(&self) -> bool;

    /// The produced object, once done. `None` means nothing was produced.
    fn result(&self) -> Option<&LoadedObject>;

    /// Allow or withhold final activation of the loaded result
    fn allow_activation(&mut self, allow: bool);

    /// Finish the job on the calling thread if the host supports it.
    /// Returns whether the job is done afterwards.
    fn wait_for_completion(&mut self) -> bool {
        self.is_done()
    }
}

/// Parameters of one `begin_load` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub asset: AssetInfo,
    pub kind: ProviderKind,
    /// Create the job with activation withheld until released
    pub withhold_activation: bool,
    pub priority: ProviderPriority,
}

/// The facility refused to create a load job
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("load rejected: {reason}")]
pub struct LoadRejected {
    pub reason: String,
}

impl LoadRejected {
    pub fn new<S: Into<String>>(reason: S) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The host facility that turns a request into a pending load job
pub trait LoadFacility: Send + Sync {
    fn begin_load(
        &self,
        request: &LoadRequest,
    ) -> std::result::Result<Box<dyn PendingLoad>, LoadRejected>;
}

/// A loaded asset object, identified by name and host type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetObject {
    pub name: String,
    pub type_name: String,
}

impl AssetObject {
    pub fn new<N: Into<String>, T: Into<String>>(name: N, type_name: T) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A scene as reported by the host's scene manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneObject {
    pub name: String,
    /// Host scene handle; `None` when the host has no live scene for it
    pub handle: Option<i32>,
}

impl SceneObject {
    pub fn new<S: Into<String>>(name: S, handle: i32) -> Self {
        Self {
            name: name.into(),
            handle: Some(handle),
        }
    }

    pub fn invalid<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            handle: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.handle.is_some()
    }
}

/// Whatever a finished load job produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedObject {
    Asset(AssetObject),
    Assets(Vec<AssetObject>),
    RawFile(Vec<u8>),
    Scene(SceneObject),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_object_validity() {
        assert!(SceneObject::new("Main", 3).is_valid());
        assert!(!SceneObject::invalid("Main").is_valid());
    }

    #[test]
    fn test_rejection_message() {
        let rejected = LoadRejected::new("scene not in build settings");
        assert_eq!(rejected.to_string(), "load rejected: scene not in build settings");
    }
}
