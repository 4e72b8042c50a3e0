//! In-memory host collaborators
//!
//! `SimulatedBundle` and `AssetDatabase` stand in for an engine's bundle
//! loader and editor asset database. Time only moves when the owner calls
//! `step()`, once per simulated frame, which makes load timelines exact and
//! reproducible. They back the CLI `simulate` command and the tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};
use yoo_asset_core::{
    AssetInfo, AssetObject, DependencyHandle, LoadFacility, LoadRejected, LoadRequest,
    LoadedObject, PendingLoad, PlayMode, SceneObject,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum BundleState {
    Loading {
        frames_left: u32,
        outcome: Result<(), String>,
    },
    Ready,
    Failed(String),
}

impl BundleState {
    fn resolve(outcome: Result<(), String>) -> Self {
        match outcome {
            Ok(()) => BundleState::Ready,
            Err(message) => BundleState::Failed(message),
        }
    }
}

/// A bundle that finishes loading after a fixed number of frames
#[derive(Debug)]
pub struct SimulatedBundle {
    name: String,
    state: Mutex<BundleState>,
    force_count: AtomicUsize,
}

impl SimulatedBundle {
    fn with_state<S: Into<String>>(name: S, state: BundleState) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(state),
            force_count: AtomicUsize::new(0),
        }
    }

    /// Already loaded
    pub fn ready<S: Into<String>>(name: S) -> Self {
        Self::with_state(name, BundleState::Ready)
    }

    /// Already failed with `message`
    pub fn failed<S: Into<String>, M: Into<String>>(name: S, message: M) -> Self {
        Self::with_state(name, BundleState::Failed(message.into()))
    }

    /// Becomes ready after `frames` calls to [`step`](Self::step)
    pub fn loading<S: Into<String>>(name: S, frames: u32) -> Self {
        Self::loading_with(name, frames, Ok(()))
    }

    /// Fails with `message` after `frames` calls to [`step`](Self::step)
    pub fn loading_then_fail<S: Into<String>, M: Into<String>>(
        name: S,
        frames: u32,
        message: M,
    ) -> Self {
        Self::loading_with(name, frames, Err(message.into()))
    }

    fn loading_with<S: Into<String>>(name: S, frames: u32, outcome: Result<(), String>) -> Self {
        let state = if frames == 0 {
            BundleState::resolve(outcome)
        } else {
            BundleState::Loading {
                frames_left: frames,
                outcome,
            }
        };
        Self::with_state(name, state)
    }

    /// Advance one frame
    pub fn step(&self) {
        let mut state = lock(&self.state);
        if let BundleState::Loading {
            frames_left,
            outcome,
        } = &mut *state
        {
            *frames_left = frames_left.saturating_sub(1);
            if *frames_left == 0 {
                let outcome = outcome.clone();
                *state = BundleState::resolve(outcome);
                debug!("Bundle {} finished loading", self.name);
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// How many times a synchronous completion was requested
    pub fn force_count(&self) -> usize {
        self.force_count.load(Ordering::SeqCst)
    }
}

impl DependencyHandle for SimulatedBundle {
    fn is_ready(&self) -> bool {
        matches!(*lock(&self.state), BundleState::Ready)
    }

    fn is_failed(&self) -> bool {
        matches!(*lock(&self.state), BundleState::Failed(_))
    }

    fn error_message(&self) -> String {
        match &*lock(&self.state) {
            BundleState::Failed(message) => message.clone(),
            _ => String::new(),
        }
    }

    fn force_synchronous_completion(&self) {
        self.force_count.fetch_add(1, Ordering::SeqCst);
        let mut state = lock(&self.state);
        if let BundleState::Loading { outcome, .. } = &*state {
            let outcome = outcome.clone();
            *state = BundleState::resolve(outcome);
            debug!("Bundle {} completed synchronously", self.name);
        }
    }
}

#[derive(Debug)]
struct JobState {
    elapsed: AtomicU32,
    total: u32,
    activation_allowed: AtomicBool,
}

impl JobState {
    fn is_done(&self) -> bool {
        self.elapsed.load(Ordering::SeqCst) >= self.total
    }
}

/// Observer for a job created by [`AssetDatabase`]
#[derive(Debug, Clone)]
pub struct JobProbe {
    asset_path: String,
    state: Arc<JobState>,
}

impl JobProbe {
    pub fn asset_path(&self) -> &str {
        &self.asset_path
    }

    pub fn is_done(&self) -> bool {
        self.state.is_done()
    }

    pub fn activation_allowed(&self) -> bool {
        self.state.activation_allowed.load(Ordering::SeqCst)
    }

    /// Finished and allowed to activate
    pub fn is_activated(&self) -> bool {
        self.is_done() && self.activation_allowed()
    }
}

/// A load job handed back to a load operation
#[derive(Debug)]
pub struct SimulatedJob {
    state: Arc<JobState>,
    object: Option<LoadedObject>,
}

impl PendingLoad for SimulatedJob {
    fn progress(&self) -> f32 {
        if self.state.total == 0 {
            return 1.0;
        }
        let elapsed = self.state.elapsed.load(Ordering::SeqCst).min(self.state.total);
        elapsed as f32 / self.state.total as f32
    }

    fn is_done(&self) -> bool {
        self.state.is_done()
    }

    fn result(&self) -> Option<&LoadedObject> {
        if self.state.is_done() {
            self.object.as_ref()
        } else {
            None
        }
    }

    fn allow_activation(&mut self, allow: bool) {
        self.state.activation_allowed.store(allow, Ordering::SeqCst);
    }

    fn wait_for_completion(&mut self) -> bool {
        self.state.elapsed.store(self.state.total, Ordering::SeqCst);
        true
    }
}

/// What the database produces for a given path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedAsset {
    pub frames_to_load: u32,
    pub object: Option<LoadedObject>,
}

/// In-memory editor asset database acting as a [`LoadFacility`].
///
/// Only usable in [`PlayMode::EditorSimulate`]; any other mode rejects
/// every request, like an editor-only provider in a player build.
#[derive(Debug)]
pub struct AssetDatabase {
    play_mode: PlayMode,
    entries: Mutex<HashMap<String, SimulatedAsset>>,
    jobs: Mutex<Vec<JobProbe>>,
    requests: Mutex<Vec<LoadRequest>>,
    next_scene_handle: AtomicI32,
}

impl AssetDatabase {
    pub fn new(play_mode: PlayMode) -> Self {
        Self {
            play_mode,
            entries: Mutex::new(HashMap::new()),
            jobs: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            next_scene_handle: AtomicI32::new(1),
        }
    }

    /// A database in editor simulation mode
    pub fn default_editor() -> Self {
        Self::new(PlayMode::EditorSimulate)
    }

    pub fn insert<S: Into<String>>(&self, asset_path: S, asset: SimulatedAsset) {
        lock(&self.entries).insert(asset_path.into(), asset);
    }

    /// Register a scene that loads as a valid scene after `frames` steps
    pub fn insert_scene<S: Into<String>>(&self, asset_path: S, frames: u32) {
        let asset_path = asset_path.into();
        let handle = self.next_scene_handle.fetch_add(1, Ordering::SeqCst);
        let name = AssetInfo::new(asset_path.clone()).asset_name().to_string();
        self.insert(
            asset_path,
            SimulatedAsset {
                frames_to_load: frames,
                object: Some(LoadedObject::Scene(SceneObject::new(name, handle))),
            },
        );
    }

    /// Register a scene the host reports as invalid once loaded
    pub fn insert_invalid_scene<S: Into<String>>(&self, asset_path: S, frames: u32) {
        let asset_path = asset_path.into();
        let name = AssetInfo::new(asset_path.clone()).asset_name().to_string();
        self.insert(
            asset_path,
            SimulatedAsset {
                frames_to_load: frames,
                object: Some(LoadedObject::Scene(SceneObject::invalid(name))),
            },
        );
    }

    /// Register a main asset of `type_name`
    pub fn insert_asset<S: Into<String>, T: Into<String>>(
        &self,
        asset_path: S,
        type_name: T,
        frames: u32,
    ) {
        let asset_path = asset_path.into();
        let name = AssetInfo::new(asset_path.clone()).asset_name().to_string();
        self.insert(
            asset_path,
            SimulatedAsset {
                frames_to_load: frames,
                object: Some(LoadedObject::Asset(AssetObject::new(name, type_name))),
            },
        );
    }

    /// Advance every job by one frame
    pub fn step(&self) {
        for job in lock(&self.jobs).iter() {
            if !job.state.is_done() {
                job.state.elapsed.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    /// Every request received so far, rejected ones included
    pub fn requests(&self) -> Vec<LoadRequest> {
        lock(&self.requests).clone()
    }

    /// Every job created so far
    pub fn jobs(&self) -> Vec<JobProbe> {
        lock(&self.jobs).clone()
    }
}

impl LoadFacility for AssetDatabase {
    fn begin_load(&self, request: &LoadRequest) -> Result<Box<dyn PendingLoad>, LoadRejected> {
        lock(&self.requests).push(request.clone());

        if !self.play_mode.supports_database_loads() {
            warn!(
                "Asset database is unavailable in {:?} play mode",
                self.play_mode
            );
            return Err(LoadRejected::new(format!(
                "asset database is unavailable in {:?} play mode",
                self.play_mode
            )));
        }

        let path = &request.asset.asset_path;
        let entry = lock(&self.entries).get(path).cloned();
        let Some(asset) = entry else {
            return Err(LoadRejected::new("asset not found in database"));
        };

        let state = Arc::new(JobState {
            elapsed: AtomicU32::new(0),
            total: asset.frames_to_load,
            activation_allowed: AtomicBool::new(!request.withhold_activation),
        });
        lock(&self.jobs).push(JobProbe {
            asset_path: path.clone(),
            state: state.clone(),
        });
        debug!(
            "Started {} job for {} (priority {})",
            request.kind,
            path,
            request.priority.as_host_priority()
        );

        Ok(Box::new(SimulatedJob {
            state,
            object: asset.object,
        }))
    }
}
