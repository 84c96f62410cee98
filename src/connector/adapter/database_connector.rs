use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::application::Connector;
use crate::domain::{
    required_string_param, system_slug, usize_param, utc_date, validate_parameters,
    AccessControl, AccessLevel, AccessPolicy, ConnectorCore, ContactInfo, DataCatalog,
    DataQuality, DataSchema, Dataset, Documentation, DocumentationExample, DomainError, Endpoint,
    EndpointExample, EndpointParameter, Environment, FaqItem, FieldConstraints, HttpMethod,
    Parameters, RelationshipKind, SchemaField, SchemaRelationship, SystemMetadata, SystemType,
    VersionInfo,
};

const DEFAULT_ROW_LIMIT: usize = 100;

/// Relational database exposed through the access layer.
///
/// Serves its catalog's sample rows in place of live query results.
pub struct DatabaseConnector {
    core: ConnectorCore,
    started_at: Instant,
}

impl DatabaseConnector {
    pub fn new(database_name: &str, description: &str) -> Self {
        let metadata = SystemMetadata {
            system_id: format!("db-{}", system_slug(database_name)),
            system_name: database_name.to_string(),
            display_name: format!("{} Database", database_name),
            system_type: SystemType::Database,
            description: description.to_string(),
            version: VersionInfo::new("1.0.0", utc_date(2024, 1, 1)),
            owner: ContactInfo::new("Data Platform Team", "data-platform@company.com")
                .with_slack("#data-platform"),
            documentation: Documentation {
                getting_started: Some(
                    "Connect using standard SQL drivers. Contact the Data Platform team for credentials."
                        .to_string(),
                ),
                api_reference: Some("SQL query interface available through execute().".to_string()),
                examples: vec![DocumentationExample {
                    title: "Simple Query".to_string(),
                    description: "Execute a SELECT query".to_string(),
                    code: r#"connector.execute("query", {"table": "users", "limit": 10})"#.to_string(),
                    language: "json".to_string(),
                }],
                faq: vec![
                    FaqItem {
                        question: "How do I get access?".to_string(),
                        answer: "Submit an access request through the IT portal.".to_string(),
                    },
                    FaqItem {
                        question: "What is the data retention policy?".to_string(),
                        answer: "Data is retained for 7 years as per company policy.".to_string(),
                    },
                ],
                ..Documentation::new(format!(
                    "{} is a production database containing critical business data.",
                    database_name
                ))
            },
            tags: vec!["database".into(), "sql".into(), "production".into()],
            categories: vec!["data-storage".into(), "core-systems".into()],
            environment: Environment::Production,
            region: Some("us-east-1".to_string()),
            data_centers: Vec::new(),
            compliance: vec!["SOC2".into(), "GDPR".into()],
            custom_metadata: Default::default(),
        };

        let core = ConnectorCore::new(metadata)
            .with_endpoints(Self::endpoints())
            .with_catalog(Self::catalog())
            .with_access_control(Self::access_control());

        Self {
            core,
            started_at: Instant::now(),
        }
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.core = self.core.with_probe_timeout(timeout);
        self
    }

    pub fn with_audit_log(mut self, enabled: bool) -> Self {
        self.core = self.core.with_audit_log(enabled);
        self
    }

    fn endpoints() -> Vec<Endpoint> {
        vec![
            Endpoint::new("/query", HttpMethod::Post, "Execute a SQL query")
                .with_parameters(vec![
                    EndpointParameter::required("query", "string", "SQL query to execute"),
                    EndpointParameter::optional(
                        "limit",
                        "number",
                        "Maximum number of rows to return",
                        Some(json!(DEFAULT_ROW_LIMIT)),
                    ),
                ])
                .with_request_body(json!({
                    "query": "SELECT * FROM users WHERE active = true",
                    "limit": 10
                }))
                .with_response_schema(json!({"data": [], "row_count": 0, "execution_time_ms": 0}))
                .with_example(EndpointExample {
                    name: "Get active users".to_string(),
                    description: "Retrieve all active users".to_string(),
                    request: Some(json!({"query": "SELECT * FROM users WHERE active = true", "limit": 10})),
                    response: json!({
                        "data": [{"id": 1, "name": "John Doe", "email": "john@example.com", "active": true}],
                        "row_count": 1,
                        "execution_time_ms": 45
                    }),
                })
                .with_rate_limit(100, "1m"),
            Endpoint::new("/tables", HttpMethod::Get, "List all available tables")
                .with_response_schema(json!({"tables": []})),
            Endpoint::new("/schema/:table", HttpMethod::Get, "Get schema information for a table")
                .with_parameters(vec![EndpointParameter::required("table", "string", "Table name")])
                .with_response_schema(json!({"schema": {}})),
        ]
    }

    fn catalog() -> DataCatalog {
        let users = Dataset::new(
            "users",
            "Users",
            "Customer and employee user accounts",
            DataSchema::new(
                "users",
                "User account information",
                vec![
                    SchemaField::new("id", "integer", false, "Unique user identifier")
                        .with_constraints(FieldConstraints::unique())
                        .with_business_definition("Auto-incrementing primary key")
                        .with_sample_values(vec![json!(1), json!(2), json!(3)]),
                    SchemaField::new("email", "varchar(255)", false, "User email address")
                        .with_constraints(FieldConstraints {
                            pattern: Some(r"^[^@]+@[^@]+\.[^@]+$".to_string()),
                            ..FieldConstraints::unique()
                        })
                        .with_business_definition("Primary contact email")
                        .with_pii(),
                    SchemaField::new("name", "varchar(100)", false, "Full name").with_pii(),
                    SchemaField::new("created_at", "timestamp", false, "Account creation timestamp"),
                    SchemaField::new("active", "boolean", false, "Account active status"),
                ],
            )
            .with_primary_key(&["id"])
            .with_indexes(&[&["email"], &["created_at"]]),
            "database://prod-db/public/users",
            "User Management Team",
        )
        .with_format("PostgreSQL Table")
        .with_record_count(125_000)
        .with_update_frequency("Real-time")
        .with_quality(
            DataQuality::new(95.0, 98.0, 95.0)
                .with_issues(vec!["2 records with missing email verification".to_string()]),
        )
        .with_tags(&["users", "authentication", "pii"])
        .with_sample_data(vec![
            json!({"id": 1, "email": "john.doe@example.com", "name": "John Doe", "created_at": "2024-01-15T10:30:00Z", "active": true}),
            json!({"id": 2, "email": "jane.smith@example.com", "name": "Jane Smith", "created_at": "2024-02-20T14:22:00Z", "active": true}),
            json!({"id": 3, "email": "bob.johnson@example.com", "name": "Bob Johnson", "created_at": "2024-03-10T09:15:00Z", "active": false}),
        ]);

        let orders = Dataset::new(
            "orders",
            "Orders",
            "Customer purchase orders",
            DataSchema::new(
                "orders",
                "Order transaction records",
                vec![
                    SchemaField::new("order_id", "integer", false, "Unique order identifier"),
                    SchemaField::new("user_id", "integer", false, "Reference to user who placed the order")
                        .with_business_definition("Foreign key to users table"),
                    SchemaField::new("total_amount", "decimal(10,2)", false, "Total order value")
                        .with_constraints(FieldConstraints {
                            min: Some(0.0),
                            ..FieldConstraints::default()
                        }),
                    SchemaField::new("status", "varchar(50)", false, "Order status").with_constraints(
                        FieldConstraints::one_of(vec![
                            json!("pending"),
                            json!("processing"),
                            json!("shipped"),
                            json!("delivered"),
                            json!("cancelled"),
                        ]),
                    ),
                    SchemaField::new("order_date", "timestamp", false, "When the order was placed"),
                ],
            )
            .with_primary_key(&["order_id"])
            .with_indexes(&[&["user_id"], &["order_date"], &["status"]])
            .with_relationship(SchemaRelationship {
                target_schema: "users".to_string(),
                kind: RelationshipKind::ManyToMany,
                foreign_key: "user_id".to_string(),
                target_key: "id".to_string(),
            }),
            "database://prod-db/public/orders",
            "E-commerce Team",
        )
        .with_format("PostgreSQL Table")
        .with_record_count(450_000)
        .with_update_frequency("Real-time")
        .with_quality(DataQuality::new(98.0, 100.0, 98.0))
        .with_tags(&["orders", "transactions", "e-commerce"])
        .with_sample_data(vec![
            json!({"order_id": 1001, "user_id": 1, "total_amount": 99.99, "status": "delivered", "order_date": "2024-06-01T10:30:00Z"}),
            json!({"order_id": 1002, "user_id": 2, "total_amount": 249.50, "status": "shipped", "order_date": "2024-06-02T14:22:00Z"}),
            json!({"order_id": 1003, "user_id": 1, "total_amount": 1250.00, "status": "processing", "order_date": "2024-06-03T09:15:00Z"}),
        ]);

        DataCatalog {
            datasets: vec![users, orders],
            tags: vec!["production".into(), "sql".into(), "relational".into()],
            categories: vec!["transactional-data".into(), "customer-data".into()],
            total_records: Some(575_000),
            data_retention: None,
        }
    }

    fn access_control() -> AccessControl {
        AccessControl {
            current_access: AccessLevel::Read,
            required_permissions: vec!["database.read".into(), "database.query".into()],
            request_access_url: Some("https://portal.company.com/access-requests".to_string()),
            access_policies: vec![
                AccessPolicy {
                    name: "Read Access".to_string(),
                    description: "Allows SELECT queries on all tables".to_string(),
                    conditions: vec![
                        "User must be in data-analysts group".to_string(),
                        "MFA enabled".to_string(),
                    ],
                    granted_by: "Data Platform Team".to_string(),
                },
                AccessPolicy {
                    name: "Write Access".to_string(),
                    description: "Allows INSERT, UPDATE, DELETE operations".to_string(),
                    conditions: vec![
                        "User must be in developers group".to_string(),
                        "Production access approval required".to_string(),
                    ],
                    granted_by: "Engineering Manager".to_string(),
                },
            ],
            audit_log: true,
        }
    }

    fn table(&self, name: &str) -> Result<&Dataset, DomainError> {
        self.core
            .catalog()
            .find(name)
            .ok_or_else(|| DomainError::not_found(format!("Table '{}' not found", name)))
    }

    fn query(&self, parameters: &Parameters) -> Result<Value, DomainError> {
        validate_parameters(parameters, &["table"])?;
        let started = Instant::now();

        let table = required_string_param(parameters, "table")?;
        let limit = usize_param(parameters, "limit", DEFAULT_ROW_LIMIT)?;
        let filter = match parameters.get("where") {
            None | Some(Value::Null) => None,
            Some(Value::Object(conditions)) => Some(conditions),
            Some(other) => {
                return Err(DomainError::invalid_input(format!(
                    "Parameter 'where' must be an object, got {}",
                    other
                )))
            }
        };

        let rows: Vec<&Value> = self
            .table(table)?
            .sample_data
            .iter()
            .flatten()
            .filter(|row| filter.map_or(true, |conditions| row_matches(row, conditions)))
            .collect();

        let query = match filter {
            Some(conditions) => format!(
                "SELECT * FROM {} WHERE {} LIMIT {}",
                table,
                Value::Object(conditions.clone()),
                limit
            ),
            None => format!("SELECT * FROM {} LIMIT {}", table, limit),
        };
        debug!("{}: {}", self.core.system_id(), query);

        Ok(json!({
            "data": rows.iter().take(limit).collect::<Vec<_>>(),
            "row_count": rows.len(),
            "execution_time_ms": u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "query": query,
        }))
    }
}

fn row_matches(row: &Value, conditions: &Map<String, Value>) -> bool {
    conditions
        .iter()
        .all(|(column, expected)| row.get(column) == Some(expected))
}

#[async_trait]
impl Connector for DatabaseConnector {
    fn core(&self) -> &ConnectorCore {
        &self.core
    }

    async fn execute(&self, operation: &str, parameters: &Parameters) -> Result<Value, DomainError> {
        match operation.to_lowercase().as_str() {
            "query" | "select" => self.query(parameters),
            "tables" => {
                let tables: Vec<&str> = self
                    .core
                    .datasets()
                    .iter()
                    .map(|d| d.id.as_str())
                    .collect();
                Ok(json!({ "tables": tables }))
            }
            "schema" => {
                validate_parameters(parameters, &["table"])?;
                let table = required_string_param(parameters, "table")?;
                Ok(json!({ "schema": self.table(table)?.schema }))
            }
            _ => Err(DomainError::unknown_operation(operation)),
        }
    }

    fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
