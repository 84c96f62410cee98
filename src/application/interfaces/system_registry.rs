use std::sync::Arc;

use crate::application::Connector;
use crate::domain::{
    metadata_matches_query, Environment, RegistryStatistics, SystemFilter, SystemType,
};

/// Keyed collection of connectors, indexed by `metadata.system_id`.
///
/// Lookups never fail: a missing system is `None` or an empty list.
pub trait SystemRegistry: Send + Sync {
    /// Stores `system` under its id. An existing entry with the same id is
    /// replaced in place.
    fn register_system(&self, system: Arc<dyn Connector>);

    fn get_system(&self, system_id: &str) -> Option<Arc<dyn Connector>>;

    /// Snapshot of every registered connector, in registration order.
    fn get_all_systems(&self) -> Vec<Arc<dyn Connector>>;

    fn unregister_system(&self, system_id: &str);

    fn search_systems(&self, query: &str, filter: Option<&SystemFilter>) -> Vec<Arc<dyn Connector>> {
        self.get_all_systems()
            .into_iter()
            .filter(|system| {
                let metadata = system.metadata();
                metadata_matches_query(metadata, query)
                    && filter.map_or(true, |f| f.matches(metadata))
            })
            .collect()
    }

    fn get_systems_by_type(&self, system_type: SystemType) -> Vec<Arc<dyn Connector>> {
        self.get_all_systems()
            .into_iter()
            .filter(|system| system.metadata().system_type == system_type)
            .collect()
    }

    fn get_systems_by_environment(&self, environment: Environment) -> Vec<Arc<dyn Connector>> {
        self.get_all_systems()
            .into_iter()
            .filter(|system| system.metadata().environment == environment)
            .collect()
    }

    fn get_statistics(&self) -> RegistryStatistics {
        let systems = self.get_all_systems();
        RegistryStatistics::collect(
            systems
                .iter()
                .map(|system| (system.metadata(), system.health().status)),
        )
    }

    fn len(&self) -> usize {
        self.get_all_systems().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
