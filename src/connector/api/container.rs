use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::application::{
    BrowseDatasetsUseCase, CheckHealthUseCase, Connector, DiscoverSystemsUseCase,
    ExecuteOperationUseCase, SystemRegistry,
};
use crate::domain::DEFAULT_PROBE_TIMEOUT;
use crate::{
    ApiConnector, CrmConnector, DatabaseConnector, FileConnector, InMemorySystemRegistry,
    DEFAULT_CRM_API_URL,
};

pub struct ContainerConfig {
    /// Upper bound on a single health probe.
    pub probe_timeout: Duration,
    /// When `false`, audit lines are suppressed for every seeded connector.
    pub audit_log: bool,
    /// Register the bundled example systems at startup.
    pub seed_examples: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            audit_log: true,
            seed_examples: true,
        }
    }
}

pub struct Container {
    registry: Arc<dyn SystemRegistry>,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let registry: Arc<dyn SystemRegistry> = Arc::new(InMemorySystemRegistry::new());

        if config.seed_examples {
            debug!("Seeding example systems");
            for system in Self::example_systems(&config) {
                registry.register_system(system);
            }
        } else {
            debug!("Starting with an empty registry");
        }

        Ok(Self { registry })
    }

    fn example_systems(config: &ContainerConfig) -> Vec<Arc<dyn Connector>> {
        let database = DatabaseConnector::new("Customer", "Primary customer database")
            .with_probe_timeout(config.probe_timeout);
        let api = ApiConnector::new(
            "Customer",
            "https://api.company.com",
            "Customer-facing REST API",
        )
        .with_probe_timeout(config.probe_timeout);
        let files = FileConnector::new("Data Lake", "/data", "Shared exports and data lake files")
            .with_probe_timeout(config.probe_timeout);
        let crm = CrmConnector::new(
            "Twenty CRM",
            DEFAULT_CRM_API_URL,
            "Modern CRM for contacts, companies, deals, and tasks",
        )
        .with_probe_timeout(config.probe_timeout);

        if config.audit_log {
            vec![
                Arc::new(database) as Arc<dyn Connector>,
                Arc::new(api),
                Arc::new(files),
                Arc::new(crm),
            ]
        } else {
            vec![
                Arc::new(database.with_audit_log(false)) as Arc<dyn Connector>,
                Arc::new(api.with_audit_log(false)),
                Arc::new(files.with_audit_log(false)),
                Arc::new(crm.with_audit_log(false)),
            ]
        }
    }

    pub fn registry(&self) -> Arc<dyn SystemRegistry> {
        self.registry.clone()
    }

    pub fn discover_use_case(&self) -> DiscoverSystemsUseCase {
        DiscoverSystemsUseCase::new(self.registry.clone())
    }

    pub fn health_use_case(&self) -> CheckHealthUseCase {
        CheckHealthUseCase::new(self.registry.clone())
    }

    pub fn browse_use_case(&self) -> BrowseDatasetsUseCase {
        BrowseDatasetsUseCase::new(self.registry.clone())
    }

    pub fn execute_use_case(&self) -> ExecuteOperationUseCase {
        ExecuteOperationUseCase::new(self.registry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_registry() {
        let container = Container::new(ContainerConfig::default()).unwrap();

        let ids: Vec<String> = container
            .registry()
            .get_all_systems()
            .iter()
            .map(|s| s.system_id().to_string())
            .collect();
        assert_eq!(ids, vec!["db-customer", "api-customer", "file-data-lake", "crm-twenty-crm"]);
    }

    #[test]
    fn test_empty_registry_and_audit_switch() {
        let container = Container::new(ContainerConfig {
            seed_examples: false,
            ..ContainerConfig::default()
        })
        .unwrap();
        assert!(container.registry().is_empty());

        let quiet = Container::new(ContainerConfig {
            audit_log: false,
            ..ContainerConfig::default()
        })
        .unwrap();
        assert!(quiet
            .registry()
            .get_all_systems()
            .iter()
            .all(|s| !s.access_control().audit_log));
    }
}
