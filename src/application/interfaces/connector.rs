use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{
    AccessControl, AccessLevel, ConnectorCore, DataSchema, Dataset, DomainError, Endpoint,
    HealthStatus, Parameters, SystemMetadata, DEFAULT_UPTIME_SECONDS,
};

/// Uniform access to one backend system.
///
/// Implementors supply [`core`](Connector::core) and [`execute`](Connector::execute);
/// everything else defaults to the behaviour in [`ConnectorCore`] and can be
/// overridden individually.
#[async_trait]
pub trait Connector: Send + Sync {
    fn core(&self) -> &ConnectorCore;

    /// Runs a system-specific operation.
    ///
    /// Unknown operations are `InvalidInput`, absent parameters are
    /// `MissingParameters`, and failures of the backend itself are `Backend`.
    async fn execute(&self, operation: &str, parameters: &Parameters) -> Result<Value, DomainError>;

    /// Live check against the backend. Succeeds immediately unless overridden.
    async fn probe(&self) -> Result<(), DomainError> {
        Ok(())
    }

    fn uptime_seconds(&self) -> u64 {
        DEFAULT_UPTIME_SECONDS
    }

    fn metadata(&self) -> &SystemMetadata {
        self.core().metadata()
    }

    fn system_id(&self) -> &str {
        self.core().system_id()
    }

    /// Health recorded by the most recent probe, without probing again.
    fn health(&self) -> HealthStatus {
        self.core().health()
    }

    fn access_control(&self) -> &AccessControl {
        self.core().access_control()
    }

    fn endpoints(&self) -> &[Endpoint] {
        self.core().endpoints()
    }

    async fn get_metadata(&self) -> SystemMetadata {
        self.core().metadata().clone()
    }

    /// Probes the backend and records the result. Never fails.
    async fn get_health(&self) -> HealthStatus {
        self.core()
            .check_health(self.probe(), || self.uptime_seconds())
            .await
    }

    async fn check_access(&self, resource: &str, level: AccessLevel) -> bool {
        self.core().check_access(resource, level)
    }

    async fn get_datasets(&self) -> Vec<Dataset> {
        self.core().datasets().to_vec()
    }

    async fn get_schema(&self, dataset_id: &str) -> Result<DataSchema, DomainError> {
        self.core().schema(dataset_id).cloned()
    }

    async fn get_sample_data(&self, dataset_id: &str, limit: usize) -> Result<Vec<Value>, DomainError> {
        self.core().sample_data(dataset_id, limit)
    }

    /// Datasets matching `query`. Never fails; no match is an empty list.
    ///
    /// Default matching ignores `filters`.
    async fn search(&self, query: &str, _filters: Option<&Parameters>) -> Vec<Dataset> {
        self.core().search_datasets(query)
    }
}
