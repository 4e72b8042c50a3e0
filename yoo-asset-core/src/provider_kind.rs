//! The closed set of provider kinds a load operation can be built for

use crate::error::ValidationFailure;
use crate::host::LoadedObject;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a scene is merged into the running scene set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneMode {
    /// Replace all loaded scenes
    #[default]
    Single,
    /// Add to the loaded scenes
    Additive,
}

/// What a load request produces. Selected by the issuer when the operation
/// is created; each kind carries its own validity predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// A single main asset
    Asset,
    /// Sub-objects of a single asset (e.g. sprites in an atlas)
    SubAssets,
    /// Every asset stored in the owning bundle
    AllAssets,
    /// Raw file contents, not deserialized by the host
    RawFile,
    /// A scene
    Scene { mode: SceneMode },
}

impl ProviderKind {
    pub fn scene(mode: SceneMode) -> Self {
        ProviderKind::Scene { mode }
    }

    pub fn is_scene(&self) -> bool {
        matches!(self, ProviderKind::Scene { .. })
    }

    /// Decide whether a finished load produced a usable object.
    ///
    /// `None` and empty collections count as missing; an object of the wrong
    /// shape or a scene the host marked invalid counts as invalid.
    pub fn validate(&self, result: Option<&LoadedObject>) -> Result<(), ValidationFailure> {
        let Some(object) = result else {
            return Err(ValidationFailure::Missing);
        };

        match (self, object) {
            (ProviderKind::Asset, LoadedObject::Asset(_)) => Ok(()),
            (ProviderKind::SubAssets | ProviderKind::AllAssets, LoadedObject::Assets(list)) => {
                if list.is_empty() {
                    Err(ValidationFailure::Missing)
                } else {
                    Ok(())
                }
            }
            (ProviderKind::RawFile, LoadedObject::RawFile(_)) => Ok(()),
            (ProviderKind::Scene { .. }, LoadedObject::Scene(scene)) => {
                if scene.is_valid() {
                    Ok(())
                } else {
                    Err(ValidationFailure::Invalid)
                }
            }
            _ => Err(ValidationFailure::Invalid),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Asset => f.write_str("asset"),
            ProviderKind::SubAssets => f.write_str("sub assets"),
            ProviderKind::AllAssets => f.write_str("all assets"),
            ProviderKind::RawFile => f.write_str("raw file"),
            ProviderKind::Scene { .. } => f.write_str("scene"),
        }
    }
}
