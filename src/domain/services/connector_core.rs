use std::future::Future;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::{
    AccessControl, AccessLevel, DataCatalog, DataSchema, Dataset, DomainError, Endpoint,
    ErrorReport, HealthStatus, Parameters, ProbeFailure, SystemMetadata,
};

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Placeholder uptime reported by connectors that do not track their own.
pub const DEFAULT_UPTIME_SECONDS: u64 = 99_999;

pub const DEFAULT_SAMPLE_LIMIT: usize = 10;

pub const AUDIT_TARGET: &str = "ual::audit";

/// State and default behaviour shared by every connector.
///
/// Concrete connectors own one of these, populate it once while they are
/// constructed, and hand it out through `Connector::core`. Only the health
/// snapshot changes afterwards.
#[derive(Debug)]
pub struct ConnectorCore {
    metadata: SystemMetadata,
    access_control: AccessControl,
    catalog: DataCatalog,
    endpoints: Vec<Endpoint>,
    health: RwLock<HealthStatus>,
    probe_timeout: Duration,
}

impl ConnectorCore {
    pub fn new(metadata: SystemMetadata) -> Self {
        Self {
            metadata,
            access_control: AccessControl::default(),
            catalog: DataCatalog::default(),
            endpoints: Vec::new(),
            health: RwLock::new(HealthStatus::unknown()),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_access_control(mut self, access_control: AccessControl) -> Self {
        self.access_control = access_control;
        self
    }

    pub fn with_catalog(mut self, catalog: DataCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Vec<Endpoint>) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_audit_log(mut self, enabled: bool) -> Self {
        self.access_control.audit_log = enabled;
        self
    }

    pub fn metadata(&self) -> &SystemMetadata {
        &self.metadata
    }

    pub fn system_id(&self) -> &str {
        &self.metadata.system_id
    }

    pub fn access_control(&self) -> &AccessControl {
        &self.access_control
    }

    pub fn catalog(&self) -> &DataCatalog {
        &self.catalog
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Last recorded health; stale until the next probe.
    pub fn health(&self) -> HealthStatus {
        self.health
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_health(&self, status: HealthStatus) {
        *self.health.write().unwrap_or_else(PoisonError::into_inner) = status;
    }

    /// Runs `probe` under the probe timeout, records the outcome as the current
    /// health and returns it. Probe failures never escape.
    pub async fn check_health<F, U>(&self, probe: F, uptime_seconds: U) -> HealthStatus
    where
        F: Future<Output = Result<(), DomainError>>,
        U: FnOnce() -> u64,
    {
        let started = Instant::now();
        let outcome = match tokio::time::timeout(self.probe_timeout, probe).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::ProbeTimedOut(self.probe_timeout)),
        };
        let elapsed = started.elapsed();

        let status = match outcome {
            Ok(()) => HealthStatus::healthy(elapsed, uptime_seconds()),
            Err(err) => {
                let failure = if err.is_probe_timeout() {
                    ProbeFailure::Timeout
                } else {
                    ProbeFailure::Error
                };
                debug!("Health probe for {} failed: {}", self.system_id(), err);
                HealthStatus::unhealthy(err.to_string(), failure, uptime_seconds())
            }
        };

        self.set_health(status.clone());
        status
    }

    /// Global comparison of the caller's level; `_resource` is not consulted.
    pub fn check_access(&self, _resource: &str, required: AccessLevel) -> bool {
        self.access_control.current_access.satisfies(required)
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.catalog.datasets
    }

    pub fn dataset(&self, dataset_id: &str) -> Result<&Dataset, DomainError> {
        self.catalog
            .find(dataset_id)
            .ok_or_else(|| DomainError::dataset_not_found(dataset_id))
    }

    pub fn schema(&self, dataset_id: &str) -> Result<&DataSchema, DomainError> {
        self.dataset(dataset_id).map(|d| &d.schema)
    }

    pub fn sample_data(&self, dataset_id: &str, limit: usize) -> Result<Vec<Value>, DomainError> {
        self.dataset(dataset_id).map(|d| d.sample_rows(limit))
    }

    /// Datasets whose name, description, or any tag contains `query`, ignoring case.
    pub fn search_datasets(&self, query: &str) -> Vec<Dataset> {
        let lower = query.to_lowercase();
        self.catalog
            .datasets
            .iter()
            .filter(|d| d.matches_query(&lower))
            .cloned()
            .collect()
    }

    /// Audit line for `operation`, or `None` when the access control disables auditing.
    pub fn audit_entry(&self, operation: &str, caller: &str, parameters: &Parameters) -> Option<String> {
        if !self.access_control.audit_log {
            return None;
        }
        let parameters = Value::Object(parameters.clone());
        Some(format!(
            "[UAL Audit] {} - {} - {} - {} {}",
            Utc::now().to_rfc3339(),
            self.system_id(),
            caller,
            operation,
            parameters
        ))
    }

    /// Emits the audit line on the `ual::audit` target. No-op when auditing is off.
    pub fn log_operation(&self, operation: &str, caller: &str, parameters: &Parameters) {
        if let Some(entry) = self.audit_entry(operation, caller, parameters) {
            info!(target: AUDIT_TARGET, "{}", entry);
        }
    }

    pub fn format_error(&self, error: &DomainError) -> ErrorReport {
        ErrorReport::from(error)
    }
}

/// Fails with every name in `required` that `parameters` lacks, in `required` order.
pub fn validate_parameters(parameters: &Parameters, required: &[&str]) -> Result<(), DomainError> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|name| !parameters.contains_key(*name))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DomainError::missing_parameters(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        utc_date, ContactInfo, Documentation, Environment, HealthState, SystemType, VersionInfo,
    };
    use serde_json::json;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn logged_by(core: &ConnectorCore, operation: &str, parameters: &Parameters) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            core.log_operation(operation, "analyst", parameters)
        });
        logs.contents()
    }

    fn core() -> ConnectorCore {
        let metadata = SystemMetadata {
            system_id: "db-test".to_string(),
            system_name: "Test".to_string(),
            display_name: "Test Database".to_string(),
            system_type: SystemType::Database,
            description: "Test system".to_string(),
            version: VersionInfo::new("1.0.0", utc_date(2024, 1, 1)),
            owner: ContactInfo::new("Data", "data@company.com"),
            documentation: Documentation::new("Test"),
            tags: vec![],
            categories: vec![],
            environment: Environment::Test,
            region: None,
            data_centers: vec![],
            compliance: vec![],
            custom_metadata: Default::default(),
        };
        let orders = Dataset::new(
            "orders",
            "Orders",
            "Customer purchase orders",
            DataSchema::new("orders", "Order records", vec![]),
            "database://test/orders",
            "Sales",
        )
        .with_tags(&["orders"])
        .with_sample_data(vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]);

        ConnectorCore::new(metadata).with_catalog(DataCatalog::new(vec![orders]))
    }

    #[test]
    fn test_validate_parameters_reports_all_missing() {
        let mut params = Parameters::new();
        params.insert("b".to_string(), json!(1));

        let err = validate_parameters(&params, &["a", "b", "c"]).unwrap_err();
        assert_eq!(err.missing_parameter_names(), ["a", "c"]);
        assert!(validate_parameters(&params, &["b"]).is_ok());
        assert!(validate_parameters(&params, &[]).is_ok());
    }

    #[test]
    fn test_present_null_parameter_counts_as_supplied() {
        let mut params = Parameters::new();
        params.insert("a".to_string(), Value::Null);

        assert!(validate_parameters(&params, &["a"]).is_ok());
    }

    #[test]
    fn test_schema_lookup() {
        let core = core();

        assert_eq!(core.schema("orders").unwrap().name, "orders");
        assert!(core.schema("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_sample_data_limit() {
        let core = core();

        assert_eq!(core.sample_data("orders", 2).unwrap().len(), 2);
        assert_eq!(core.sample_data("orders", 50).unwrap().len(), 3);
        assert!(core.sample_data("missing", 2).unwrap_err().is_not_found());
    }

    #[test]
    fn test_search_datasets() {
        let core = core();

        assert_eq!(core.search_datasets("ORD").len(), 1);
        assert!(core.search_datasets("zzz").is_empty());
    }

    #[test]
    fn test_check_access_ignores_resource() {
        let core = core().with_access_control(AccessControl::new(AccessLevel::Write));

        assert!(core.check_access("anything", AccessLevel::Read));
        assert!(core.check_access("", AccessLevel::Write));
        assert!(!core.check_access("orders", AccessLevel::Admin));
    }

    #[tokio::test]
    async fn test_check_health_success() {
        let core = core();
        assert_eq!(core.health().status, HealthState::Unknown);

        let status = core.check_health(async { Ok(()) }, || 7).await;

        assert_eq!(status.status, HealthState::Healthy);
        assert_eq!(status.uptime_seconds, 7);
        assert_eq!(core.health(), status);
    }

    #[tokio::test]
    async fn test_check_health_timeout() {
        let core = core().with_probe_timeout(Duration::from_millis(20));

        let status = core
            .check_health(
                async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok(())
                },
                || DEFAULT_UPTIME_SECONDS,
            )
            .await;

        assert_eq!(status.status, HealthState::Unhealthy);
        assert_eq!(status.probe_failure, Some(ProbeFailure::Timeout));
        assert_eq!(status.response_time_ms, 0);
    }

    #[test]
    fn test_format_error() {
        let core = core();
        let report = core.format_error(&DomainError::missing_parameters(["table"]));

        assert_eq!(report.error, "Missing required parameters: table");
    }

    #[test]
    fn test_log_operation_emits_audit_line() {
        let core = core().with_audit_log(true);
        let mut params = Parameters::new();
        params.insert("table".to_string(), json!("orders"));

        let logged = logged_by(&core, "query", &params);

        assert!(logged.contains("[UAL Audit]"));
        assert!(logged.contains("db-test - analyst - query"));
        assert!(logged.contains(r#"{"table":"orders"}"#));
    }

    #[test]
    fn test_log_operation_is_silent_without_audit() {
        let core = core().with_audit_log(false);

        assert!(core.audit_entry("query", "analyst", &Parameters::new()).is_none());
        assert!(logged_by(&core, "query", &Parameters::new()).is_empty());
    }
}
