use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Healthy,
    Degraded,
    Unhealthy,
    #[default]
    Unknown,
}

impl HealthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthState::Healthy => "healthy",
            HealthState::Degraded => "degraded",
            HealthState::Unhealthy => "unhealthy",
            HealthState::Unknown => "unknown",
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthState::Healthy)
    }

    pub fn is_unhealthy(&self) -> bool {
        matches!(self, HealthState::Unhealthy)
    }
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why the last health probe did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeFailure {
    /// The probe answered with an error.
    Error,
    /// The probe never answered within the deadline.
    Timeout,
}

pub const OPERATIONAL_DETAILS: &str = "System is operational";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: HealthState,
    pub last_checked: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub response_time_ms: u64,
    /// Percentage, 0 to 100.
    pub error_rate: f64,
    pub details: Option<String>,
    pub probe_failure: Option<ProbeFailure>,
}

impl HealthStatus {
    /// State before any probe has run.
    pub fn unknown() -> Self {
        Self {
            status: HealthState::Unknown,
            last_checked: Utc::now(),
            uptime_seconds: 0,
            response_time_ms: 0,
            error_rate: 0.0,
            details: None,
            probe_failure: None,
        }
    }

    pub fn healthy(response_time: Duration, uptime_seconds: u64) -> Self {
        Self {
            status: HealthState::Healthy,
            last_checked: Utc::now(),
            uptime_seconds,
            response_time_ms: u64::try_from(response_time.as_millis()).unwrap_or(u64::MAX),
            error_rate: 0.0,
            details: Some(OPERATIONAL_DETAILS.to_string()),
            probe_failure: None,
        }
    }

    pub fn unhealthy(details: impl Into<String>, failure: ProbeFailure, uptime_seconds: u64) -> Self {
        Self {
            status: HealthState::Unhealthy,
            last_checked: Utc::now(),
            uptime_seconds,
            response_time_ms: 0,
            error_rate: 100.0,
            details: Some(details.into()),
            probe_failure: Some(failure),
        }
    }

    pub fn with_state(mut self, status: HealthState) -> Self {
        self.status = status;
        self
    }

    pub fn timed_out(&self) -> bool {
        self.probe_failure == Some(ProbeFailure::Timeout)
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::unknown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_is_initial_state() {
        let health = HealthStatus::default();

        assert_eq!(health.status, HealthState::Unknown);
        assert_eq!(health.error_rate, 0.0);
        assert!(health.details.is_none());
    }

    #[test]
    fn test_healthy_records_response_time() {
        let health = HealthStatus::healthy(Duration::from_millis(42), 10);

        assert!(health.status.is_healthy());
        assert_eq!(health.response_time_ms, 42);
        assert_eq!(health.uptime_seconds, 10);
        assert_eq!(health.details.as_deref(), Some(OPERATIONAL_DETAILS));
    }

    #[test]
    fn test_unhealthy_zeroes_response_time() {
        let health = HealthStatus::unhealthy("connection refused", ProbeFailure::Timeout, 5);

        assert!(health.status.is_unhealthy());
        assert_eq!(health.response_time_ms, 0);
        assert_eq!(health.error_rate, 100.0);
        assert!(health.timed_out());
    }
}
