//! Resource manager
//!
//! Issues load operations on behalf of callers. Asset loads for the same
//! path and kind share one operation and are reference counted; scene
//! loads are never shared because each one creates a new scene instance.

use crate::operation::LoadOperation;
use crate::scheduler::{OperationId, OperationSystem, UpdateReport};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use yoo_asset_core::{
    AssetInfo, DependencyHandle, LoadFacility, ProviderKind, ProviderPriority, RuntimeSettings,
    SceneMode,
};

/// Maps an asset to the bundle that contains it
pub trait BundleResolver: Send + Sync {
    fn owner_bundle(&self, asset: &AssetInfo) -> Arc<dyn DependencyHandle>;
}

impl<F> BundleResolver for F
where
    F: Fn(&AssetInfo) -> Arc<dyn DependencyHandle> + Send + Sync,
{
    fn owner_bundle(&self, asset: &AssetInfo) -> Arc<dyn DependencyHandle> {
        self(asset)
    }
}

struct SharedProvider {
    id: OperationId,
    ref_count: u32,
}

/// Front door for issuing loads
pub struct ResourceManager {
    settings: RuntimeSettings,
    facility: Arc<dyn LoadFacility>,
    resolver: Box<dyn BundleResolver>,
    system: OperationSystem,
    providers: HashMap<String, SharedProvider>,
    ref_counts: HashMap<OperationId, String>,
}

impl ResourceManager {
    pub fn new<R>(settings: RuntimeSettings, facility: Arc<dyn LoadFacility>, resolver: R) -> Self
    where
        R: BundleResolver + 'static,
    {
        info!("Resource manager started in {:?} play mode", settings.play_mode);
        Self {
            system: OperationSystem::from_settings(&settings),
            settings,
            facility,
            resolver: Box::new(resolver),
            providers: HashMap::new(),
            ref_counts: HashMap::new(),
        }
    }

    fn provider_guid(asset: &AssetInfo, kind: &ProviderKind) -> String {
        format!("{}+{}", kind, asset.asset_path)
    }

    fn priority_or_default(&self, priority: Option<ProviderPriority>) -> ProviderPriority {
        priority.unwrap_or(self.settings.default_priority)
    }

    /// Load an asset. Repeated requests for the same asset and kind return
    /// the same operation. Scene kinds are forwarded to
    /// [`load_scene`](Self::load_scene) and never shared.
    pub fn load_asset(
        &mut self,
        asset: AssetInfo,
        kind: ProviderKind,
        priority: Option<ProviderPriority>,
    ) -> OperationId {
        if let ProviderKind::Scene { mode } = kind {
            return self.load_scene(asset, mode, false, priority);
        }

        let guid = Self::provider_guid(&asset, &kind);
        if let Some(shared) = self.providers.get_mut(&guid) {
            shared.ref_count += 1;
            debug!("Reusing provider {} (refs {})", guid, shared.ref_count);
            return shared.id;
        }

        let dependency = self.resolver.owner_bundle(&asset);
        let operation = LoadOperation::new(asset, kind, dependency, self.facility.clone())
            .with_priority(self.priority_or_default(priority));
        let id = self.system.start(operation);

        self.providers
            .insert(guid.clone(), SharedProvider { id, ref_count: 1 });
        self.ref_counts.insert(id, guid);
        id
    }

    /// Load a scene. With `suspend_load` the scene finishes loading but
    /// stays inactive until [`unsuspend`](Self::unsuspend) is called.
    pub fn load_scene(
        &mut self,
        asset: AssetInfo,
        mode: SceneMode,
        suspend_load: bool,
        priority: Option<ProviderPriority>,
    ) -> OperationId {
        let dependency = self.resolver.owner_bundle(&asset);
        let operation = LoadOperation::new(
            asset,
            ProviderKind::scene(mode),
            dependency,
            self.facility.clone(),
        )
        .with_priority(self.priority_or_default(priority))
        .with_suspend_activation(suspend_load);
        self.system.start(operation)
    }

    /// Release a suspended scene. `false` if the load job has not started.
    pub fn unsuspend(&mut self, id: OperationId) -> bool {
        self.system
            .get_mut(id)
            .is_some_and(|operation| operation.release_suspension())
    }

    /// Drop one reference. The operation is destroyed once it finished and
    /// its last reference is gone.
    pub fn release(&mut self, id: OperationId) -> bool {
        let Some(guid) = self.ref_counts.get(&id).cloned() else {
            return self.system.release(id);
        };

        let Some(shared) = self.providers.get_mut(&guid) else {
            return false;
        };
        shared.ref_count = shared.ref_count.saturating_sub(1);
        if shared.ref_count > 0 {
            return true;
        }

        self.providers.remove(&guid);
        self.ref_counts.remove(&id);
        self.system.release(id)
    }

    /// Run one scheduler turn
    pub fn update(&mut self) -> UpdateReport {
        self.system.update()
    }

    pub fn operation(&self, id: OperationId) -> Option<&LoadOperation> {
        self.system.get(id)
    }

    pub fn operation_mut(&mut self, id: OperationId) -> Option<&mut LoadOperation> {
        self.system.get_mut(id)
    }

    /// Reference count of a shared asset operation; scenes report `None`
    pub fn ref_count(&self, id: OperationId) -> Option<u32> {
        self.ref_counts
            .get(&id)
            .and_then(|guid| self.providers.get(guid))
            .map(|shared| shared.ref_count)
    }

    pub fn is_idle(&self) -> bool {
        self.system.is_idle()
    }

    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    pub fn operation_count(&self) -> usize {
        self.system.len()
    }
}
