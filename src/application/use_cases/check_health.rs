use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;
use tracing::{info, warn};

use crate::application::SystemRegistry;
use crate::domain::{DomainError, HealthStatus};

/// Probes registered systems and records their health.
pub struct CheckHealthUseCase {
    registry: Arc<dyn SystemRegistry>,
}

impl CheckHealthUseCase {
    pub fn new(registry: Arc<dyn SystemRegistry>) -> Self {
        Self { registry }
    }

    /// Probes every registered system concurrently.
    ///
    /// Results keep registration order.
    pub async fn execute(&self) -> Vec<(String, HealthStatus)> {
        let systems = self.registry.get_all_systems();
        let start_time = Instant::now();

        let statuses = join_all(systems.iter().map(|system| system.get_health())).await;

        let results: Vec<(String, HealthStatus)> = systems
            .iter()
            .map(|system| system.system_id().to_string())
            .zip(statuses)
            .collect();

        for (system_id, status) in &results {
            if status.status.is_unhealthy() {
                warn!(
                    "{} is unhealthy: {}",
                    system_id,
                    status.details.as_deref().unwrap_or("no details")
                );
            }
        }

        info!(
            "Checked {} systems in {:?}",
            results.len(),
            start_time.elapsed()
        );

        results
    }

    pub async fn check_one(&self, system_id: &str) -> Result<HealthStatus, DomainError> {
        let system = self
            .registry
            .get_system(system_id)
            .ok_or_else(|| DomainError::system_not_found(system_id))?;

        Ok(system.get_health().await)
    }
}
