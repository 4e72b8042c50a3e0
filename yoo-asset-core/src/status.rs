//! Load operation status

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a single load operation.
///
/// Variants are declared in transition order. Compare [`LoadStatus::rank`]
/// values to check that a status sequence only ever moves forward;
/// `Succeeded` and `Failed` share the last rank since both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadStatus {
    NotStarted,
    WaitingOnDependency,
    Loading,
    Validating,
    Succeeded,
    Failed,
}

impl LoadStatus {
    /// Whether no further transition can happen
    pub fn is_terminal(self) -> bool {
        matches!(self, LoadStatus::Succeeded | LoadStatus::Failed)
    }

    /// Position in the forward phase order
    pub fn rank(self) -> u8 {
        match self {
            LoadStatus::NotStarted => 0,
            LoadStatus::WaitingOnDependency => 1,
            LoadStatus::Loading => 2,
            LoadStatus::Validating => 3,
            LoadStatus::Succeeded | LoadStatus::Failed => 4,
        }
    }

    /// Whether moving from `self` to `next` is a legal forward step
    pub fn can_advance_to(self, next: LoadStatus) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LoadStatus::NotStarted => "NotStarted",
            LoadStatus::WaitingOnDependency => "WaitingOnDependency",
            LoadStatus::Loading => "Loading",
            LoadStatus::Validating => "Validating",
            LoadStatus::Succeeded => "Succeeded",
            LoadStatus::Failed => "Failed",
        }
    }
}

impl Default for LoadStatus {
    fn default() -> Self {
        LoadStatus::NotStarted
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(LoadStatus::Succeeded.is_terminal());
        assert!(LoadStatus::Failed.is_terminal());
        assert!(!LoadStatus::Validating.is_terminal());
    }

    #[test]
    fn test_forward_only() {
        assert!(LoadStatus::NotStarted.can_advance_to(LoadStatus::WaitingOnDependency));
        assert!(LoadStatus::WaitingOnDependency.can_advance_to(LoadStatus::Failed));
        assert!(!LoadStatus::Loading.can_advance_to(LoadStatus::WaitingOnDependency));
        assert!(!LoadStatus::Failed.can_advance_to(LoadStatus::Succeeded));
        assert!(!LoadStatus::Loading.can_advance_to(LoadStatus::Loading));
        assert!(LoadStatus::Validating.rank() < LoadStatus::Succeeded.rank());
        assert_eq!(LoadStatus::Succeeded.rank(), LoadStatus::Failed.rank());
    }
}
