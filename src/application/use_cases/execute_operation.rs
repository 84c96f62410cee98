use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::application::SystemRegistry;
use crate::domain::{caller_of, AccessLevel, DomainError, Parameters};

const MUTATING_PREFIXES: [&str; 3] = ["create", "update", "delete"];

/// Level a caller needs to run `operation`: write for create/update/delete
/// operations, read for everything else.
pub fn required_level(operation: &str) -> AccessLevel {
    let lower = operation.to_lowercase();
    if MUTATING_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        AccessLevel::Write
    } else {
        AccessLevel::Read
    }
}

/// Access-checked, audited dispatch to a connector's `execute`.
pub struct ExecuteOperationUseCase {
    registry: Arc<dyn SystemRegistry>,
}

impl ExecuteOperationUseCase {
    pub fn new(registry: Arc<dyn SystemRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(
        &self,
        system_id: &str,
        operation: &str,
        parameters: &Parameters,
    ) -> Result<Value, DomainError> {
        let system = self
            .registry
            .get_system(system_id)
            .ok_or_else(|| DomainError::system_not_found(system_id))?;

        let required = required_level(operation);
        if !system.check_access(operation, required).await {
            return Err(DomainError::access_denied(operation, required));
        }

        system
            .core()
            .log_operation(operation, caller_of(parameters), parameters);

        match system.execute(operation, parameters).await {
            Ok(result) => {
                debug!("{} on {} succeeded", operation, system_id);
                Ok(result)
            }
            Err(e) => {
                warn!("{} on {} failed: {}", operation, system_id, e);
                Err(e)
            }
        }
    }
}
