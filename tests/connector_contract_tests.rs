//! Behaviour every connector inherits from the default contract.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use ual::domain::{
    utc_date, AccessControl, AccessLevel, ConnectorCore, ContactInfo, DataCatalog, DataSchema,
    Dataset, Documentation, DomainError, Environment, HealthState, HealthStatus, Parameters,
    ProbeFailure, SchemaField, SystemMetadata, SystemType, VersionInfo,
};
use ual::{Connector, DiscoverSystemsUseCase, InMemorySystemRegistry, SystemFilter, SystemRegistry};

#[derive(Clone, Copy)]
enum Probe {
    Ok,
    Fail,
    Hang,
}

struct TestConnector {
    core: ConnectorCore,
    probe: Probe,
}

impl TestConnector {
    fn new(id: &str, system_type: SystemType) -> Self {
        Self::in_environment(id, system_type, Environment::Test)
    }

    fn in_environment(id: &str, system_type: SystemType, environment: Environment) -> Self {
        let metadata = SystemMetadata {
            system_id: id.to_string(),
            system_name: id.to_string(),
            display_name: id.to_uppercase(),
            system_type,
            description: format!("Test system {}", id),
            version: VersionInfo::new("1.0.0", utc_date(2024, 1, 1)),
            owner: ContactInfo::new("QA", "qa@company.com"),
            documentation: Documentation::default(),
            tags: vec!["test".to_string()],
            categories: vec![],
            environment,
            region: None,
            data_centers: vec![],
            compliance: vec![],
            custom_metadata: Default::default(),
        };

        Self {
            core: ConnectorCore::new(metadata).with_catalog(orders_catalog()),
            probe: Probe::Ok,
        }
    }

    fn with_probe(mut self, probe: Probe) -> Self {
        self.probe = probe;
        self
    }

    fn with_access(mut self, level: AccessLevel) -> Self {
        self.core = self.core.with_access_control(AccessControl::new(level));
        self
    }

    fn with_timeout(mut self, timeout: Duration) -> Self {
        self.core = self.core.with_probe_timeout(timeout);
        self
    }
}

#[async_trait]
impl Connector for TestConnector {
    fn core(&self) -> &ConnectorCore {
        &self.core
    }

    async fn execute(&self, operation: &str, _parameters: &Parameters) -> Result<Value, DomainError> {
        Err(DomainError::unknown_operation(operation))
    }

    async fn probe(&self) -> Result<(), DomainError> {
        match self.probe {
            Probe::Ok => Ok(()),
            Probe::Fail => Err(DomainError::probe_failed("connection refused")),
            Probe::Hang => std::future::pending().await,
        }
    }
}

fn orders_schema() -> DataSchema {
    DataSchema::new(
        "orders",
        "Customer orders",
        vec![
            SchemaField::new("id", "integer", false, "Order id"),
            SchemaField::new("total", "decimal", false, "Order total"),
        ],
    )
    .with_primary_key(&["id"])
}

fn orders_catalog() -> DataCatalog {
    let orders = Dataset::new(
        "orders",
        "Orders",
        "Every order placed",
        orders_schema(),
        "db://shop/orders",
        "Commerce",
    )
    .with_tags(&["orders"])
    .with_sample_data((1..=5).map(|i| json!({"id": i, "total": i * 10})).collect());

    let users = Dataset::new(
        "users",
        "Users",
        "Registered accounts",
        DataSchema::new("users", "Accounts", vec![]),
        "db://shop/users",
        "Identity",
    );

    DataCatalog::new(vec![orders, users])
}

#[test]
fn test_access_levels_are_totally_ordered() {
    let levels = AccessLevel::ALL;

    for (i, held) in levels.iter().enumerate() {
        for (j, required) in levels.iter().enumerate() {
            assert_eq!(held.satisfies(*required), i >= j, "{} vs {}", held, required);
        }
    }
}

#[tokio::test]
async fn test_check_access_compares_against_current_level() {
    let reader = TestConnector::new("reader", SystemType::Database).with_access(AccessLevel::Read);
    let admin = TestConnector::new("admin", SystemType::Database).with_access(AccessLevel::Admin);

    assert!(reader.check_access("orders", AccessLevel::Read).await);
    assert!(!reader.check_access("orders", AccessLevel::Write).await);
    assert!(admin.check_access("anything", AccessLevel::Admin).await);
}

#[tokio::test]
async fn test_successful_probe_reports_healthy() {
    let connector = TestConnector::new("ok", SystemType::Database);

    for _ in 0..3 {
        let health = connector.get_health().await;
        assert_eq!(health.status, HealthState::Healthy);
        assert_eq!(health.error_rate, 0.0);
        assert!(health.probe_failure.is_none());
    }
    assert_eq!(connector.health().status, HealthState::Healthy);
}

#[tokio::test]
async fn test_failing_probe_reports_unhealthy() {
    let connector = TestConnector::new("down", SystemType::Database).with_probe(Probe::Fail);

    for _ in 0..3 {
        let health = connector.get_health().await;
        assert_eq!(health.status, HealthState::Unhealthy);
        assert_eq!(health.error_rate, 100.0);
        assert_eq!(health.response_time_ms, 0);
        assert_eq!(health.probe_failure, Some(ProbeFailure::Error));
        assert!(!health.details.unwrap_or_default().is_empty());
    }
}

#[tokio::test]
async fn test_hanging_probe_is_reported_as_timeout() {
    let connector = TestConnector::new("slow", SystemType::Database)
        .with_probe(Probe::Hang)
        .with_timeout(Duration::from_millis(20));

    let health = connector.get_health().await;

    assert_eq!(health.status, HealthState::Unhealthy);
    assert!(health.timed_out());
    assert!(health.details.unwrap_or_default().contains("timed out"));
}

#[tokio::test]
async fn test_get_schema() {
    let connector = TestConnector::new("shop", SystemType::Database);

    assert_eq!(connector.get_schema("orders").await.unwrap(), orders_schema());

    let err = connector.get_schema("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Dataset 'missing' not found");
}

#[tokio::test]
async fn test_sample_data_respects_limit() {
    let connector = TestConnector::new("shop", SystemType::Database);

    assert_eq!(connector.get_sample_data("orders", 3).await.unwrap().len(), 3);
    assert_eq!(connector.get_sample_data("orders", 50).await.unwrap().len(), 5);
    assert!(connector.get_sample_data("users", 3).await.unwrap().is_empty());
    assert!(connector.get_sample_data("missing", 3).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_default_search_ignores_filters() {
    let connector = TestConnector::new("shop", SystemType::Database);

    let found = connector.search("ord", None).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "orders");

    let mut filters = Parameters::new();
    filters.insert("datasets".to_string(), json!(["users"]));
    assert_eq!(connector.search("ORD", Some(&filters)).await.len(), 1);

    assert!(connector.search("zzz", None).await.is_empty());
}

#[test]
fn test_statistics_over_mixed_health() {
    let registry = InMemorySystemRegistry::new();

    let healthy = TestConnector::new("a", SystemType::Database);
    healthy.core().set_health(HealthStatus::unknown().with_state(HealthState::Healthy));
    let unhealthy = TestConnector::new("b", SystemType::RestApi);
    unhealthy.core().set_health(HealthStatus::unknown().with_state(HealthState::Unhealthy));
    let degraded = TestConnector::new("c", SystemType::Database);
    degraded.core().set_health(HealthStatus::unknown().with_state(HealthState::Degraded));

    registry.register_system(Arc::new(healthy));
    registry.register_system(Arc::new(unhealthy));
    registry.register_system(Arc::new(degraded));

    let stats = registry.get_statistics();
    assert_eq!(stats.total_systems, 3);
    assert_eq!(stats.count_of_type(SystemType::Database), 2);
    assert_eq!(stats.count_of_type(SystemType::RestApi), 1);
    assert_eq!(stats.by_type.len(), 2);
    assert_eq!(stats.healthy_systems, 1);
    assert_eq!(stats.unhealthy_systems, 1);
}

#[test]
fn test_registry_round_trip_and_type_search() {
    let registry = InMemorySystemRegistry::new();
    assert_eq!(registry.get_statistics().total_systems, 0);

    let api = TestConnector::new("api-1", SystemType::RestApi);
    let api_metadata = api.metadata().clone();

    registry.register_system(Arc::new(TestConnector::new("db-1", SystemType::Database)));
    registry.register_system(Arc::new(api));
    registry.register_system(Arc::new(TestConnector::new("db-2", SystemType::Database)));

    assert_eq!(registry.get_system("api-1").unwrap().metadata(), &api_metadata);

    let databases: Vec<String> = registry
        .get_systems_by_type(SystemType::Database)
        .iter()
        .map(|s| s.system_id().to_string())
        .collect();
    assert_eq!(databases, vec!["db-1", "db-2"]);

    registry.unregister_system("db-1");
    assert!(registry.get_system("db-1").is_none());
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_overwrite_leaves_second_instance() {
    let registry = InMemorySystemRegistry::new();

    registry.register_system(Arc::new(
        TestConnector::new("dup", SystemType::Database).with_access(AccessLevel::Read),
    ));
    registry.register_system(Arc::new(
        TestConnector::new("dup", SystemType::Database).with_access(AccessLevel::Admin),
    ));

    assert_eq!(registry.len(), 1);
    let current = registry.get_system("dup").unwrap();
    assert_eq!(current.access_control().current_access, AccessLevel::Admin);
}

fn mixed_registry() -> Arc<InMemorySystemRegistry> {
    let registry = Arc::new(InMemorySystemRegistry::new());
    registry.register_system(Arc::new(TestConnector::in_environment(
        "db-prod",
        SystemType::Database,
        Environment::Production,
    )));
    registry.register_system(Arc::new(TestConnector::in_environment(
        "api-prod",
        SystemType::RestApi,
        Environment::Production,
    )));
    registry.register_system(Arc::new(TestConnector::in_environment(
        "db-stage",
        SystemType::Database,
        Environment::Staging,
    )));
    registry
}

fn ids(systems: &[Arc<dyn Connector>]) -> Vec<String> {
    systems.iter().map(|s| s.system_id().to_string()).collect()
}

#[test]
fn test_empty_query_with_type_filter_keeps_registration_order() {
    let registry = mixed_registry();

    let filter = SystemFilter::new().with_type(SystemType::Database);
    assert_eq!(ids(&registry.search_systems("", Some(&filter))), vec!["db-prod", "db-stage"]);

    let filter = SystemFilter::new().with_type(SystemType::Crm);
    assert!(registry.search_systems("", Some(&filter)).is_empty());
}

#[test]
fn test_systems_by_environment() {
    let registry = mixed_registry();

    assert_eq!(
        ids(&registry.get_systems_by_environment(Environment::Production)),
        vec!["db-prod", "api-prod"]
    );
    assert_eq!(ids(&registry.get_systems_by_environment(Environment::Staging)), vec!["db-stage"]);
    assert!(registry.get_systems_by_environment(Environment::Development).is_empty());
}

#[test]
fn test_discovery_by_type_and_environment() {
    let discovery = DiscoverSystemsUseCase::new(mixed_registry());

    assert_eq!(ids(&discovery.by_type(SystemType::Database)), vec!["db-prod", "db-stage"]);
    assert_eq!(ids(&discovery.by_type(SystemType::RestApi)), vec!["api-prod"]);
    assert!(discovery.by_type(SystemType::FileSystem).is_empty());

    assert_eq!(
        ids(&discovery.by_environment(Environment::Production)),
        vec!["db-prod", "api-prod"]
    );
    assert!(discovery.by_environment(Environment::Test).is_empty());
}
