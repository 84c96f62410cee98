use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::DomainError;

/// Open key/value payload passed to `execute` and used for search filters.
pub type Parameters = Map<String, Value>;

/// Caller name recorded in audit events when the parameters carry none.
pub const ANONYMOUS_CALLER: &str = "anonymous";

/// Caller-facing rendering of a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            timestamp: Utc::now(),
        }
    }
}

impl From<&DomainError> for ErrorReport {
    fn from(err: &DomainError) -> Self {
        Self::new(err.to_string())
    }
}

pub fn string_param<'a>(parameters: &'a Parameters, name: &str) -> Result<Option<&'a str>, DomainError> {
    match parameters.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(DomainError::invalid_input(format!(
            "Parameter '{}' must be a string, got {}",
            name, other
        ))),
    }
}

/// Like [`string_param`] but absence is a `MissingParameters` failure.
pub fn required_string_param<'a>(parameters: &'a Parameters, name: &str) -> Result<&'a str, DomainError> {
    string_param(parameters, name)?.ok_or_else(|| DomainError::missing_parameters([name]))
}

pub fn usize_param(parameters: &Parameters, name: &str, default: usize) -> Result<usize, DomainError> {
    match parameters.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                DomainError::invalid_input(format!(
                    "Parameter '{}' must be a non-negative integer, got {}",
                    name, value
                ))
            }),
    }
}

/// The `caller` parameter, or [`ANONYMOUS_CALLER`].
pub fn caller_of(parameters: &Parameters) -> &str {
    parameters
        .get("caller")
        .and_then(Value::as_str)
        .unwrap_or(ANONYMOUS_CALLER)
}
