use std::sync::Arc;

use serde_json::Value;

use crate::application::{Connector, SystemRegistry};
use crate::domain::{DataSchema, Dataset, DomainError, Parameters};

/// Dataset-scoped lookups addressed by system id.
///
/// Unlike the registry itself, a missing system here is a `NotFound` failure.
pub struct BrowseDatasetsUseCase {
    registry: Arc<dyn SystemRegistry>,
}

impl BrowseDatasetsUseCase {
    pub fn new(registry: Arc<dyn SystemRegistry>) -> Self {
        Self { registry }
    }

    fn system(&self, system_id: &str) -> Result<Arc<dyn Connector>, DomainError> {
        self.registry
            .get_system(system_id)
            .ok_or_else(|| DomainError::system_not_found(system_id))
    }

    pub async fn datasets(&self, system_id: &str) -> Result<Vec<Dataset>, DomainError> {
        Ok(self.system(system_id)?.get_datasets().await)
    }

    pub async fn schema(&self, system_id: &str, dataset_id: &str) -> Result<DataSchema, DomainError> {
        self.system(system_id)?.get_schema(dataset_id).await
    }

    pub async fn sample(
        &self,
        system_id: &str,
        dataset_id: &str,
        limit: usize,
    ) -> Result<Vec<Value>, DomainError> {
        self.system(system_id)?
            .get_sample_data(dataset_id, limit)
            .await
    }

    pub async fn search(
        &self,
        system_id: &str,
        query: &str,
        filters: Option<&Parameters>,
    ) -> Result<Vec<Dataset>, DomainError> {
        Ok(self.system(system_id)?.search(query, filters).await)
    }
}
