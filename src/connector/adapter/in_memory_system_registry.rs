use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use crate::application::{Connector, SystemRegistry};

#[derive(Default)]
struct RegistryStore {
    systems: HashMap<String, Arc<dyn Connector>>,
    /// Ids in first-registration order.
    order: Vec<String>,
}

/// Process-lifetime registry keeping connectors in memory.
///
/// Created once by the entry point and shared as `Arc<dyn SystemRegistry>`.
pub struct InMemorySystemRegistry {
    store: RwLock<RegistryStore>,
}

impl InMemorySystemRegistry {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(RegistryStore::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemorySystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemRegistry for InMemorySystemRegistry {
    fn register_system(&self, system: Arc<dyn Connector>) {
        let system_id = system.system_id().to_string();
        let display_name = system.metadata().display_name.clone();

        let mut store = self.write();
        if store.systems.contains_key(&system_id) {
            warn!(
                "System '{}' is already registered. Overwriting.",
                system_id
            );
        } else {
            store.order.push(system_id.clone());
        }
        store.systems.insert(system_id.clone(), system);
        drop(store);

        info!("Registered UAL system: {} ({})", system_id, display_name);
    }

    fn get_system(&self, system_id: &str) -> Option<Arc<dyn Connector>> {
        self.read().systems.get(system_id).cloned()
    }

    fn get_all_systems(&self) -> Vec<Arc<dyn Connector>> {
        let store = self.read();
        store
            .order
            .iter()
            .filter_map(|id| store.systems.get(id).cloned())
            .collect()
    }

    fn unregister_system(&self, system_id: &str) {
        let removed = {
            let mut store = self.write();
            let removed = store.systems.remove(system_id).is_some();
            if removed {
                store.order.retain(|id| id != system_id);
            }
            removed
        };

        if removed {
            info!("Unregistered UAL system: {}", system_id);
        } else {
            warn!("System '{}' was not registered", system_id);
        }
    }

    fn len(&self) -> usize {
        self.read().systems.len()
    }
}
