use std::sync::Arc;

use tracing::debug;

use crate::application::{Connector, SystemRegistry};
use crate::domain::{Environment, RegistryStatistics, SystemFilter, SystemType};

/// Read-side queries over the registry.
pub struct DiscoverSystemsUseCase {
    registry: Arc<dyn SystemRegistry>,
}

impl DiscoverSystemsUseCase {
    pub fn new(registry: Arc<dyn SystemRegistry>) -> Self {
        Self { registry }
    }

    pub fn execute(&self, query: &str, filter: Option<&SystemFilter>) -> Vec<Arc<dyn Connector>> {
        let systems = self.registry.search_systems(query, filter);
        debug!("Search '{}' matched {} systems", query, systems.len());
        systems
    }

    pub fn list(&self) -> Vec<Arc<dyn Connector>> {
        self.registry.get_all_systems()
    }

    pub fn get_by_id(&self, system_id: &str) -> Option<Arc<dyn Connector>> {
        self.registry.get_system(system_id)
    }

    pub fn by_type(&self, system_type: SystemType) -> Vec<Arc<dyn Connector>> {
        self.registry.get_systems_by_type(system_type)
    }

    pub fn by_environment(&self, environment: Environment) -> Vec<Arc<dyn Connector>> {
        self.registry.get_systems_by_environment(environment)
    }

    pub fn statistics(&self) -> RegistryStatistics {
        self.registry.get_statistics()
    }
}
