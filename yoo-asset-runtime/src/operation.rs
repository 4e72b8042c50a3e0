//! Load operation state machine
//!
//! One `LoadOperation` tracks one request from dependency resolution to a
//! validated result. It is driven entirely by [`LoadOperation::tick`]:
//!
//! ```text
//! NotStarted -> WaitingOnDependency -> Loading -> Validating -> Succeeded
//!                      |                  |            |
//!                      +------------------+------------+------> Failed
//! ```
//!
//! Every failure is a state, never an `Err`, so the scheduler only ever has
//! to look at [`LoadOperation::status`].

use crate::notifier::{CompletionNotifier, ListenerId};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use yoo_asset_core::{
    AssetInfo, DependencyHandle, LoadError, LoadFacility, LoadRequest, LoadStatus, LoadedObject,
    PROGRESS_COMPLETE, PendingLoad, ProviderKind, ProviderPriority, ValidationFailure,
};

/// Non-terminal progress stays strictly below this value
const MAX_PENDING_PROGRESS: f32 = 0.99;

/// Terminal snapshot handed to completion listeners
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub asset: AssetInfo,
    pub status: LoadStatus,
    pub progress: f32,
    pub error: Option<LoadError>,
}

impl LoadOutcome {
    pub fn is_success(&self) -> bool {
        self.status == LoadStatus::Succeeded
    }
}

/// A single asynchronous load request
pub struct LoadOperation {
    asset: AssetInfo,
    kind: ProviderKind,
    priority: ProviderPriority,
    suspend_activation: bool,
    dependency: Arc<dyn DependencyHandle>,
    facility: Arc<dyn LoadFacility>,

    status: LoadStatus,
    progress: f32,
    last_error: Option<LoadError>,
    pending: Option<Box<dyn PendingLoad>>,
    sync_requested: bool,
    notifier: CompletionNotifier<LoadOutcome>,
}

impl LoadOperation {
    /// Create an operation that loads `asset` as `kind` once `dependency`
    /// is ready, using `facility` to start the actual load
    pub fn new(
        asset: AssetInfo,
        kind: ProviderKind,
        dependency: Arc<dyn DependencyHandle>,
        facility: Arc<dyn LoadFacility>,
    ) -> Self {
        Self {
            asset,
            kind,
            priority: ProviderPriority::default(),
            suspend_activation: false,
            dependency,
            facility,
            status: LoadStatus::NotStarted,
            progress: 0.0,
            last_error: None,
            pending: None,
            sync_requested: false,
            notifier: CompletionNotifier::new(),
        }
    }

    pub fn with_priority(mut self, priority: ProviderPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Finish the load but withhold activation until
    /// [`release_suspension`](Self::release_suspension) is called
    pub fn with_suspend_activation(mut self, suspend: bool) -> Self {
        self.suspend_activation = suspend;
        self
    }

    /// Advance by at most one phase. Does nothing once terminal.
    pub fn tick(&mut self) {
        match self.status {
            LoadStatus::Succeeded | LoadStatus::Failed => {}
            LoadStatus::NotStarted => self.advance(LoadStatus::WaitingOnDependency),
            LoadStatus::WaitingOnDependency => self.check_dependency(),
            LoadStatus::Loading => self.begin_load(),
            LoadStatus::Validating => self.check_result(),
        }
    }

    fn check_dependency(&mut self) {
        if self.sync_requested && !self.dependency.is_done() {
            self.dependency.force_synchronous_completion();
        }

        if self.dependency.is_failed() {
            let mut message = self.dependency.error_message();
            if message.is_empty() {
                message = format!("Dependency failed to load : {}", self.asset);
            }
            self.fail(LoadError::dependency_failed(message), true);
            return;
        }

        if self.dependency.is_ready() {
            self.advance(LoadStatus::Loading);
        }
    }

    fn begin_load(&mut self) {
        let request = LoadRequest {
            asset: self.asset.clone(),
            kind: self.kind.clone(),
            withhold_activation: self.suspend_activation,
            priority: self.priority,
        };

        match self.facility.begin_load(&request) {
            Ok(mut pending) => {
                pending.allow_activation(!self.suspend_activation);
                self.pending = Some(pending);
                self.advance(LoadStatus::Validating);
            }
            Err(rejected) => {
                let message = format!(
                    "Failed to load {} : {} ({})",
                    self.kind, self.asset, rejected.reason
                );
                self.fail(LoadError::load_rejected(message), false);
            }
        }
    }

    fn check_result(&mut self) {
        let Some(pending) = self.pending.as_ref() else {
            // Validating is only entered after a pending load was stored
            self.fail(
                LoadError::validation_failed(
                    ValidationFailure::Missing,
                    format!("No pending load for {} : {}", self.kind, self.asset),
                ),
                true,
            );
            return;
        };

        let reported = pending.progress().clamp(0.0, MAX_PENDING_PROGRESS);
        if reported > self.progress {
            self.progress = reported;
        }

        if !pending.is_done() {
            return;
        }

        match self.kind.validate(pending.result()) {
            Ok(()) => self.succeed(),
            Err(failure) => {
                let message = match failure {
                    ValidationFailure::Invalid => {
                        format!("The loaded {} is invalid : {}", self.kind, self.asset)
                    }
                    ValidationFailure::Missing => {
                        format!("The loaded {} is missing : {}", self.kind, self.asset)
                    }
                };
                self.fail(LoadError::validation_failed(failure, message), true);
            }
        }
    }

    fn advance(&mut self, next: LoadStatus) {
        debug_assert!(self.status.can_advance_to(next));
        debug!("{} [{}]: {} -> {}", self.asset, self.kind, self.status, next);
        self.status = next;
    }

    fn succeed(&mut self) {
        self.progress = PROGRESS_COMPLETE;
        self.advance(LoadStatus::Succeeded);
        info!("Loaded {} : {}", self.kind, self.asset);
        self.notify();
    }

    fn fail(&mut self, load_error: LoadError, snap_progress: bool) {
        error!("{}", load_error.message);
        if snap_progress {
            self.progress = PROGRESS_COMPLETE;
        }
        self.last_error = Some(load_error);
        self.advance(LoadStatus::Failed);
        self.notify();
    }

    fn notify(&mut self) {
        let outcome = self.outcome();
        self.notifier.fire(outcome);
    }

    /// Let a suspended load activate. Returns `false`, doing nothing, when
    /// no load job has been started yet.
    pub fn release_suspension(&mut self) -> bool {
        match self.pending.as_mut() {
            Some(pending) => {
                pending.allow_activation(true);
                true
            }
            None => false,
        }
    }

    /// Ask for immediate completion. While waiting on the dependency this
    /// blocks until the dependency has finished; later ticks keep forcing it.
    pub fn force_synchronous_completion(&mut self) {
        self.sync_requested = true;
        if self.status == LoadStatus::WaitingOnDependency {
            debug!("Forcing dependency of {} : {}", self.kind, self.asset);
            self.dependency.force_synchronous_completion();
        }
    }

    /// Tick until terminal, blocking on the dependency and, if the host can
    /// finish jobs synchronously, on the load job. Returns the status
    /// reached; it is not terminal when the host could not finish in place.
    pub fn wait_for_completion(&mut self) -> LoadStatus {
        self.force_synchronous_completion();

        while !self.status.is_terminal() {
            let before = self.status;
            if before == LoadStatus::Validating {
                if let Some(pending) = self.pending.as_mut() {
                    if !pending.wait_for_completion() {
                        warn!(
                            "Host cannot complete {} : {} synchronously",
                            self.kind, self.asset
                        );
                        break;
                    }
                }
            }

            self.tick();
            if self.status == before {
                break;
            }
        }

        self.status
    }

    /// Register a completion listener. If the operation already finished,
    /// the listener runs immediately.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&LoadOutcome) + Send + 'static,
    {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Snapshot of the current state
    pub fn outcome(&self) -> LoadOutcome {
        LoadOutcome {
            asset: self.asset.clone(),
            status: self.status,
            progress: self.progress,
            error: self.last_error.clone(),
        }
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_ref().map(|e| e.message.as_str())
    }

    pub fn error(&self) -> Option<&LoadError> {
        self.last_error.as_ref()
    }

    pub fn is_done(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn has_pending_load(&self) -> bool {
        self.pending.is_some()
    }

    /// The loaded object, once succeeded
    pub fn result(&self) -> Option<&LoadedObject> {
        if self.status != LoadStatus::Succeeded {
            return None;
        }
        self.pending.as_ref().and_then(|p| p.result())
    }

    /// Scene name for scene loads
    pub fn scene_name(&self) -> Option<&str> {
        self.kind.is_scene().then(|| self.asset.asset_name())
    }

    pub fn asset(&self) -> &AssetInfo {
        &self.asset
    }

    pub fn kind(&self) -> &ProviderKind {
        &self.kind
    }

    pub fn priority(&self) -> ProviderPriority {
        self.priority
    }

    pub fn suspend_activation(&self) -> bool {
        self.suspend_activation
    }
}

impl fmt::Debug for LoadOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOperation")
            .field("asset", &self.asset)
            .field("kind", &self.kind)
            .field("status", &self.status)
            .field("progress", &self.progress)
            .field("last_error", &self.last_error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{AssetDatabase, SimulatedBundle};
    use anyhow::Context;
    use std::sync::Mutex;
    use yoo_asset_core::{LoadErrorKind, PlayMode, SceneMode};

    fn scene_operation(
        bundle: &Arc<SimulatedBundle>,
        database: &Arc<AssetDatabase>,
        path: &str,
    ) -> LoadOperation {
        LoadOperation::new(
            AssetInfo::new(path),
            ProviderKind::scene(SceneMode::Single),
            bundle.clone(),
            database.clone(),
        )
    }

    #[test]
    fn test_one_transition_per_tick() {
        let bundle = Arc::new(SimulatedBundle::ready("scenes"));
        let database = Arc::new(AssetDatabase::new(PlayMode::EditorSimulate));
        database.insert_scene("Assets/Main.unity", 1);
        let mut op = scene_operation(&bundle, &database, "Assets/Main.unity");

        op.tick();
        assert_eq!(op.status(), LoadStatus::WaitingOnDependency);
        op.tick();
        assert_eq!(op.status(), LoadStatus::Loading);
        op.tick();
        assert_eq!(op.status(), LoadStatus::Validating);
        op.tick();
        assert_eq!(op.status(), LoadStatus::Validating);

        database.step();
        op.tick();
        assert_eq!(op.status(), LoadStatus::Succeeded);
        assert_eq!(op.progress(), 1.0);
        assert_eq!(op.last_error(), None);
        assert_eq!(op.scene_name(), Some("Main"));
    }

    #[test]
    fn test_dependency_failure_copies_message() {
        let bundle = Arc::new(SimulatedBundle::failed("scenes", "bundle missing"));
        let database = Arc::new(AssetDatabase::new(PlayMode::EditorSimulate));
        database.insert_scene("Assets/Main.unity", 1);
        let mut op = scene_operation(&bundle, &database, "Assets/Main.unity");

        op.tick();
        op.tick();
        assert_eq!(op.status(), LoadStatus::Failed);
        assert_eq!(op.last_error(), Some("bundle missing"));
        assert_eq!(op.error().map(|e| e.kind), Some(LoadErrorKind::DependencyFailed));
        assert!(database.requests().is_empty());
    }

    #[test]
    fn test_empty_dependency_message_is_replaced() {
        let bundle = Arc::new(SimulatedBundle::failed("scenes", ""));
        let database = Arc::new(AssetDatabase::new(PlayMode::EditorSimulate));
        let mut op = scene_operation(&bundle, &database, "Assets/Main.unity");

        op.tick();
        op.tick();
        assert!(op.last_error().is_some_and(|m| !m.is_empty()));
    }

    #[test]
    fn test_rejection_keeps_progress() {
        let bundle = Arc::new(SimulatedBundle::ready("scenes"));
        let database = Arc::new(AssetDatabase::new(PlayMode::EditorSimulate));
        let mut op = scene_operation(&bundle, &database, "Assets/Unknown.unity");

        for _ in 0..3 {
            op.tick();
        }
        assert_eq!(op.status(), LoadStatus::Failed);
        assert_eq!(op.error().map(|e| e.kind), Some(LoadErrorKind::LoadRejected));
        assert!(op.last_error().unwrap().contains("Failed to load scene"));
        assert_eq!(op.progress(), 0.0);
    }

    #[test]
    fn test_invalid_scene_fails_validation() {
        let bundle = Arc::new(SimulatedBundle::ready("scenes"));
        let database = Arc::new(AssetDatabase::new(PlayMode::EditorSimulate));
        database.insert_invalid_scene("Assets/Broken.unity", 0);
        let mut op = scene_operation(&bundle, &database, "Assets/Broken.unity");

        for _ in 0..4 {
            op.tick();
        }
        assert_eq!(op.status(), LoadStatus::Failed);
        assert_eq!(
            op.error().map(|e| e.kind),
            Some(LoadErrorKind::ValidationFailed(ValidationFailure::Invalid))
        );
        assert_eq!(
            op.last_error(),
            Some("The loaded scene is invalid : Assets/Broken.unity")
        );
        assert_eq!(op.progress(), 1.0);
    }

    #[test]
    fn test_progress_never_decreases_or_reaches_one_early() {
        let bundle = Arc::new(SimulatedBundle::ready("scenes"));
        let database = Arc::new(AssetDatabase::new(PlayMode::EditorSimulate));
        database.insert_scene("Assets/Big.unity", 4);
        let mut op = scene_operation(&bundle, &database, "Assets/Big.unity");

        let mut last = 0.0;
        while !op.is_done() {
            database.step();
            op.tick();
            assert!(op.progress() >= last);
            if !op.is_done() {
                assert!(op.progress() < 1.0);
            }
            last = op.progress();
        }
        assert_eq!(op.progress(), 1.0);
    }

    #[test]
    fn test_release_suspension() -> anyhow::Result<()> {
        let bundle = Arc::new(SimulatedBundle::ready("scenes"));
        let database = Arc::new(AssetDatabase::new(PlayMode::EditorSimulate));
        database.insert_scene("Assets/Main.unity", 1);
        let mut op =
            scene_operation(&bundle, &database, "Assets/Main.unity").with_suspend_activation(true);

        assert!(!op.release_suspension());
        op.tick();
        op.tick();
        assert!(!op.release_suspension());
        op.tick();

        let job = database.jobs().pop().context("scene job was not started")?;
        assert!(!job.activation_allowed());
        assert!(op.release_suspension());
        assert!(job.activation_allowed());
        Ok(())
    }

    #[test]
    fn test_wait_for_completion_forces_dependency() {
        let bundle = Arc::new(SimulatedBundle::loading("scenes", 100));
        let database = Arc::new(AssetDatabase::new(PlayMode::EditorSimulate));
        database.insert_scene("Assets/Main.unity", 100);
        let mut op = scene_operation(&bundle, &database, "Assets/Main.unity");

        assert_eq!(op.wait_for_completion(), LoadStatus::Succeeded);
        assert_eq!(bundle.force_count(), 1);
    }

    #[test]
    fn test_force_finishes_waiting_dependency_immediately() {
        let bundle = Arc::new(SimulatedBundle::loading("scenes", 100));
        let database = Arc::new(AssetDatabase::new(PlayMode::EditorSimulate));
        database.insert_scene("Assets/Main.unity", 3);
        let mut op = scene_operation(&bundle, &database, "Assets/Main.unity");

        op.tick();
        assert_eq!(op.status(), LoadStatus::WaitingOnDependency);
        op.force_synchronous_completion();
        assert!(bundle.is_done());
        assert_eq!(bundle.force_count(), 1);

        op.tick();
        assert_eq!(op.status(), LoadStatus::Loading);
        assert_eq!(bundle.force_count(), 1);
    }

    #[test]
    fn test_force_before_start_only_sets_flag() {
        let bundle = Arc::new(SimulatedBundle::loading("scenes", 100));
        let database = Arc::new(AssetDatabase::new(PlayMode::EditorSimulate));
        let mut op = scene_operation(&bundle, &database, "Assets/Main.unity");

        op.force_synchronous_completion();
        assert_eq!(bundle.force_count(), 0);
        op.tick();
        op.tick();
        assert_eq!(bundle.force_count(), 1);
    }

    #[test]
    fn test_listener_sees_terminal_state() {
        let bundle = Arc::new(SimulatedBundle::failed("scenes", "bundle missing"));
        let database = Arc::new(AssetDatabase::new(PlayMode::EditorSimulate));
        let mut op = scene_operation(&bundle, &database, "Assets/Main.unity");

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        op.subscribe(move |outcome| seen_clone.lock().unwrap().push(outcome.clone()));

        for _ in 0..10 {
            op.tick();
        }

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].status, LoadStatus::Failed);
        assert_eq!(seen[0].progress, 1.0);
        assert_eq!(
            seen[0].error.as_ref().map(|e| e.message.as_str()),
            Some("bundle missing")
        );
    }
}
