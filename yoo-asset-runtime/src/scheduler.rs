//! Operation scheduler
//!
//! Owns live load operations and ticks each of them once per update, in
//! descending priority. Priority is only an ordering hint; when a time
//! slice is configured, operations further down the list simply wait for
//! a later update.

use crate::operation::LoadOperation;
use std::time::{Duration, Instant};
use tracing::{debug, trace};
use yoo_asset_core::RuntimeSettings;

/// Identifies an operation owned by an [`OperationSystem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId(u64);

impl OperationId {
    pub fn value(self) -> u64 {
        self.0
    }
}

struct Slot {
    id: OperationId,
    operation: LoadOperation,
    released: bool,
}

/// Counters from a single [`OperationSystem::update`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Operations ticked this update
    pub ticked: usize,
    /// Operations that reached a terminal state this update
    pub completed: usize,
    /// Finished and released operations dropped this update
    pub removed: usize,
    /// The time slice ran out before every operation was ticked
    pub sliced: bool,
}

/// Cooperative scheduler for load operations
pub struct OperationSystem {
    slots: Vec<Slot>,
    next_id: u64,
    max_time_slice: Option<Duration>,
}

impl OperationSystem {
    pub fn new(max_time_slice: Option<Duration>) -> Self {
        Self {
            slots: Vec::new(),
            next_id: 0,
            max_time_slice,
        }
    }

    pub fn from_settings(settings: &RuntimeSettings) -> Self {
        Self::new(settings.max_time_slice())
    }

    /// Take ownership of an operation. It is ticked from the next update.
    pub fn start(&mut self, operation: LoadOperation) -> OperationId {
        let id = OperationId(self.next_id);
        self.next_id += 1;

        // Stable: equal priorities keep insertion order
        let priority = operation.priority();
        let index = self
            .slots
            .iter()
            .position(|slot| slot.operation.priority() < priority)
            .unwrap_or(self.slots.len());

        debug!(
            "Starting operation {} for {} (priority {})",
            id.0,
            operation.asset(),
            priority.value()
        );
        self.slots.insert(
            index,
            Slot {
                id,
                operation,
                released: false,
            },
        );
        id
    }

    /// Tick every unfinished operation once, then drop released
    /// operations that have finished
    pub fn update(&mut self) -> UpdateReport {
        let mut report = UpdateReport::default();
        let started = Instant::now();

        for slot in self.slots.iter_mut() {
            if slot.operation.is_done() {
                continue;
            }

            if let Some(slice) = self.max_time_slice {
                if report.ticked > 0 && started.elapsed() >= slice {
                    report.sliced = true;
                    break;
                }
            }

            slot.operation.tick();
            report.ticked += 1;
            if slot.operation.is_done() {
                report.completed += 1;
            }
        }

        let before = self.slots.len();
        self.slots
            .retain(|slot| !(slot.released && slot.operation.is_done()));
        report.removed = before - self.slots.len();

        trace!("Operation system update: {:?}", report);
        report
    }

    /// Tell the system the issuer no longer needs the operation. It is
    /// dropped once it has finished; there is no cancellation.
    pub fn release(&mut self, id: OperationId) -> bool {
        match self.slots.iter_mut().find(|slot| slot.id == id) {
            Some(slot) => {
                slot.released = true;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: OperationId) -> Option<&LoadOperation> {
        self.slots
            .iter()
            .find(|slot| slot.id == id)
            .map(|slot| &slot.operation)
    }

    pub fn get_mut(&mut self, id: OperationId) -> Option<&mut LoadOperation> {
        self.slots
            .iter_mut()
            .find(|slot| slot.id == id)
            .map(|slot| &mut slot.operation)
    }

    /// Operations in tick order
    pub fn ids(&self) -> Vec<OperationId> {
        self.slots.iter().map(|slot| slot.id).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Operations that have not reached a terminal state
    pub fn active_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| !slot.operation.is_done())
            .count()
    }

    pub fn is_idle(&self) -> bool {
        self.active_count() == 0
    }
}

impl Default for OperationSystem {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{AssetDatabase, SimulatedBundle};
    use std::sync::Arc;
    use yoo_asset_core::{AssetInfo, LoadStatus, PlayMode, ProviderKind, ProviderPriority};

    fn asset_operation(
        database: &Arc<AssetDatabase>,
        path: &str,
        priority: u32,
    ) -> LoadOperation {
        LoadOperation::new(
            AssetInfo::new(path),
            ProviderKind::Asset,
            Arc::new(SimulatedBundle::ready("assets")),
            database.clone(),
        )
        .with_priority(ProviderPriority(priority))
    }

    #[test]
    fn test_priority_order() {
        let database = Arc::new(AssetDatabase::new(PlayMode::EditorSimulate));
        let mut system = OperationSystem::default();
        let low = system.start(asset_operation(&database, "Assets/A.prefab", 1));
        let high = system.start(asset_operation(&database, "Assets/B.prefab", 9));
        let low_again = system.start(asset_operation(&database, "Assets/C.prefab", 1));

        assert_eq!(system.ids(), vec![high, low, low_again]);
    }

    #[test]
    fn test_released_operations_are_dropped_when_done() {
        let database = Arc::new(AssetDatabase::new(PlayMode::EditorSimulate));
        database.insert_asset("Assets/A.prefab", "GameObject", 0);
        let mut system = OperationSystem::default();
        let id = system.start(asset_operation(&database, "Assets/A.prefab", 0));

        assert!(system.release(id));
        system.update();
        assert_eq!(system.len(), 1);

        for _ in 0..5 {
            system.update();
        }
        assert!(system.get(id).is_none());
        assert!(system.is_empty());
    }

    #[test]
    fn test_unreleased_operations_stay() {
        let database = Arc::new(AssetDatabase::new(PlayMode::EditorSimulate));
        let mut system = OperationSystem::default();
        let id = system.start(asset_operation(&database, "Assets/Missing.prefab", 0));

        for _ in 0..5 {
            system.update();
        }
        assert_eq!(system.get(id).map(|op| op.status()), Some(LoadStatus::Failed));
        assert!(system.is_idle());
        assert!(!system.release(OperationId(99)));
    }

    #[test]
    fn test_zero_time_slice_still_ticks_one() {
        let database = Arc::new(AssetDatabase::new(PlayMode::EditorSimulate));
        let mut system = OperationSystem::new(Some(Duration::ZERO));
        system.start(asset_operation(&database, "Assets/A.prefab", 0));
        system.start(asset_operation(&database, "Assets/B.prefab", 0));

        let report = system.update();
        assert_eq!(report.ticked, 1);
        assert!(report.sliced);
    }
}
