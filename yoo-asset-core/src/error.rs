//! Error types for asset loading and package building

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fallible framework operations
pub type Result<T> = std::result::Result<T, YooAssetError>;

/// Main error type for operations that return `Result`.
///
/// Load operations never return this; their failures are states (see
/// [`LoadError`]).
#[derive(Error, Debug)]
pub enum YooAssetError {
    /// IO errors when reading/writing files
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A file copy performed by a build task failed
    #[error("Failed to copy {from:?} to {to:?}: {source}")]
    CopyFile {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Settings or build configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// A build task asked the context for an object nobody registered
    #[error("Build context object not found: {type_name}")]
    MissingContextObject { type_name: &'static str },

    /// A build parameter failed validation
    #[error("Invalid build parameter '{field}': {message}")]
    InvalidParameter { field: String, message: String },
}

impl YooAssetError {
    /// Create a copy-file error
    pub fn copy_file<P: Into<PathBuf>, Q: Into<PathBuf>>(
        from: P,
        to: Q,
        source: io::Error,
    ) -> Self {
        Self::CopyFile {
            from: from.into(),
            to: to.into(),
            source,
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::InvalidParameter {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Why a finished load did not produce a usable object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationFailure {
    /// The host reported completion but produced nothing
    Missing,
    /// The host produced an object that is not usable for this request
    Invalid,
}

/// Classification of a terminal load failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadErrorKind {
    /// The owning bundle failed to load
    DependencyFailed,
    /// The host loading facility refused to start a load job
    LoadRejected,
    /// The load finished but the result failed validation
    ValidationFailed(ValidationFailure),
}

impl fmt::Display for LoadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadErrorKind::DependencyFailed => f.write_str("dependency failed"),
            LoadErrorKind::LoadRejected => f.write_str("load rejected"),
            LoadErrorKind::ValidationFailed(ValidationFailure::Missing) => {
                f.write_str("validation failed (missing)")
            }
            LoadErrorKind::ValidationFailed(ValidationFailure::Invalid) => {
                f.write_str("validation failed (invalid)")
            }
        }
    }
}

/// A terminal load failure: its kind plus the message exposed as `last_error`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct LoadError {
    pub kind: LoadErrorKind,
    pub message: String,
}

impl LoadError {
    pub fn new<S: Into<String>>(kind: LoadErrorKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Failure copied verbatim from the dependency bundle
    pub fn dependency_failed<S: Into<String>>(message: S) -> Self {
        Self::new(LoadErrorKind::DependencyFailed, message)
    }

    /// Failure when the host refused to create a load job
    pub fn load_rejected<S: Into<String>>(message: S) -> Self {
        Self::new(LoadErrorKind::LoadRejected, message)
    }

    /// Failure when the finished load did not pass validation
    pub fn validation_failed<S: Into<String>>(failure: ValidationFailure, message: S) -> Self {
        Self::new(LoadErrorKind::ValidationFailed(failure), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = YooAssetError::invalid_parameter("package_name", "must not be empty");
        assert!(matches!(err, YooAssetError::InvalidParameter { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = YooAssetError::copy_file(
            "a/OutputCache",
            "b/OutputCache",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        let msg = format!("{}", err);
        assert!(msg.contains("a/OutputCache"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_load_error_displays_message_only() {
        let err = LoadError::dependency_failed("bundle missing");
        assert_eq!(err.to_string(), "bundle missing");
        assert_eq!(err.kind, LoadErrorKind::DependencyFailed);
    }
}
