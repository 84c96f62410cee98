use std::time::Duration;

use thiserror::Error;

use super::AccessLevel;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    NotFound(String),

    #[error("Missing required parameters: {}", .0.join(", "))]
    MissingParameters(Vec<String>),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Access denied: {required} access required for '{resource}'")]
    AccessDenied {
        resource: String,
        required: AccessLevel,
    },

    #[error("Health probe failed: {0}")]
    ProbeFailed(String),

    #[error("Health probe timed out after {}ms", .0.as_millis())]
    ProbeTimedOut(Duration),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl DomainError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn dataset_not_found(dataset_id: &str) -> Self {
        Self::NotFound(format!("Dataset '{}' not found", dataset_id))
    }

    pub fn system_not_found(system_id: &str) -> Self {
        Self::NotFound(format!("System '{}' not found", system_id))
    }

    pub fn missing_parameters<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingParameters(names.into_iter().map(Into::into).collect())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn unknown_operation(operation: &str) -> Self {
        Self::InvalidInput(format!("Unknown operation: {}", operation))
    }

    pub fn access_denied(resource: impl Into<String>, required: AccessLevel) -> Self {
        Self::AccessDenied {
            resource: resource.into(),
            required,
        }
    }

    pub fn probe_failed(msg: impl Into<String>) -> Self {
        Self::ProbeFailed(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_missing_parameters(&self) -> bool {
        matches!(self, Self::MissingParameters(_))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }

    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_))
    }

    pub fn is_probe_timeout(&self) -> bool {
        matches!(self, Self::ProbeTimedOut(_))
    }

    /// Names reported by a `MissingParameters` failure, empty for every other kind.
    pub fn missing_parameter_names(&self) -> &[String] {
        match self {
            Self::MissingParameters(names) => names,
            _ => &[],
        }
    }
}
