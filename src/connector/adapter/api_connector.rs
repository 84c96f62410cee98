use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

use crate::application::Connector;
use crate::domain::{
    required_string_param, string_param, system_slug, utc_date, validate_parameters,
    AccessControl, AccessLevel, AccessPolicy, ChangelogEntry, ConnectorCore, ContactInfo,
    DataCatalog, DataQuality, DataSchema, Dataset, Documentation, DomainError, Endpoint,
    EndpointExample, EndpointParameter, Environment, FaqItem, HttpMethod, Parameters,
    SchemaField, SystemMetadata, SystemType, UpcomingVersion, VersionInfo,
};

/// REST API exposed through the access layer. Responses are canned.
pub struct ApiConnector {
    core: ConnectorCore,
    base_url: String,
}

impl ApiConnector {
    pub fn new(api_name: &str, base_url: &str, description: &str) -> Self {
        let metadata = SystemMetadata {
            system_id: format!("api-{}", system_slug(api_name)),
            system_name: api_name.to_string(),
            display_name: format!("{} API", api_name),
            system_type: SystemType::RestApi,
            description: description.to_string(),
            version: VersionInfo::new("2.1.0", utc_date(2024, 6, 1)).with_next_version(UpcomingVersion {
                version: "3.0.0".to_string(),
                release_date: utc_date(2025, 1, 1),
                breaking_changes: vec![
                    "Authentication moved to OAuth 2.0".to_string(),
                    "Pagination parameters renamed".to_string(),
                    "Date format changed to ISO 8601".to_string(),
                ],
            }),
            owner: ContactInfo {
                on_call_schedule: Some("https://oncall.company.com/api-team".to_string()),
                ..ContactInfo::new("API Platform Team", "api-team@company.com").with_slack("#api-platform")
            },
            documentation: Documentation {
                getting_started: Some(
                    "Obtain an API key from the developer portal and include it in the X-API-Key header."
                        .to_string(),
                ),
                api_reference: Some(format!("Full OpenAPI documentation available at {}/docs", base_url)),
                faq: vec![FaqItem {
                    question: "What is the rate limit?".to_string(),
                    answer: "Standard tier: 1000 requests/hour. Premium tier: 10000 requests/hour."
                        .to_string(),
                }],
                changelog: vec![ChangelogEntry {
                    version: "2.1.0".to_string(),
                    date: utc_date(2024, 6, 1),
                    changes: vec!["Added product search endpoint".to_string()],
                    breaking: false,
                }],
                ..Documentation::new(format!(
                    "{} provides RESTful endpoints for accessing business data and services.",
                    api_name
                ))
            },
            tags: vec!["api".into(), "rest".into(), "production".into(), "customer-facing".into()],
            categories: vec!["integration".into(), "customer-data".into()],
            environment: Environment::Production,
            region: Some("us-east-1".to_string()),
            data_centers: Vec::new(),
            compliance: vec!["SOC2".into()],
            custom_metadata: Default::default(),
        };

        let core = ConnectorCore::new(metadata)
            .with_endpoints(Self::endpoints())
            .with_catalog(Self::catalog(base_url))
            .with_access_control(Self::access_control());

        Self {
            core,
            base_url: base_url.trim_end_matches('/').to_string(),
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

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoints() -> Vec<Endpoint> {
        vec![
            Endpoint::new("/v2/users", HttpMethod::Get, "List users with pagination")
                .with_parameters(vec![
                    EndpointParameter::optional("page", "integer", "Page number", Some(json!(1))),
                    EndpointParameter::optional("per_page", "integer", "Items per page", Some(json!(20))),
                    EndpointParameter {
                        allowed_values: Some(vec![json!("name"), json!("created_at")]),
                        ..EndpointParameter::optional("sort", "string", "Sort field", Some(json!("created_at")))
                    },
                ])
                .with_example(EndpointExample {
                    name: "Get first page".to_string(),
                    description: "Fetch the first page of users".to_string(),
                    request: Some(json!({"page": 1, "per_page": 20})),
                    response: json!({"data": [{"id": 1, "name": "John Doe", "email": "john@example.com"}]}),
                })
                .with_authentication(&["API Key", "OAuth 2.0"])
                .with_rate_limit(1000, "1h"),
            Endpoint::new("/v2/users/:id", HttpMethod::Get, "Get a user by id")
                .with_parameters(vec![EndpointParameter::required("id", "integer", "User id")])
                .with_authentication(&["API Key"]),
            Endpoint::new("/v2/orders", HttpMethod::Post, "Create an order")
                .with_request_body(json!({"user_id": 0, "items": [{"product_id": 0, "quantity": 0}]}))
                .with_response_schema(json!({"order_id": 0, "status": ""}))
                .with_authentication(&["API Key"])
                .with_rate_limit(100, "1m"),
            Endpoint::new("/v2/products/search", HttpMethod::Get, "Search products")
                .with_parameters(vec![
                    EndpointParameter::required("q", "string", "Search text"),
                    EndpointParameter::optional("category", "string", "Category filter", None),
                ]),
        ]
    }

    fn catalog(base_url: &str) -> DataCatalog {
        let users = Dataset::new(
            "users-endpoint",
            "Users API Endpoint",
            "User profiles served by the REST API",
            DataSchema::new(
                "User",
                "User resource representation",
                vec![
                    SchemaField::new("id", "integer", false, "User id"),
                    SchemaField::new("name", "string", false, "Full name").with_pii(),
                    SchemaField::new("email", "string", false, "Email address").with_pii(),
                    SchemaField::new("created_at", "datetime", false, "Creation timestamp"),
                ],
            )
            .with_primary_key(&["id"]),
            format!("{}/v2/users", base_url.trim_end_matches('/')),
            "API Platform Team",
        )
        .with_format("JSON")
        .with_record_count(1250)
        .with_update_frequency("Real-time")
        .with_quality(DataQuality::new(97.0, 99.0, 97.0))
        .with_tags(&["api", "users", "rest"])
        .with_sample_data(vec![
            json!({"id": 1, "name": "John Doe", "email": "john@example.com", "created_at": "2024-01-15T10:30:00Z"}),
            json!({"id": 2, "name": "Jane Smith", "email": "jane@example.com", "created_at": "2024-02-20T14:22:00Z"}),
        ]);

        DataCatalog {
            tags: vec!["api".into(), "rest".into()],
            categories: vec!["customer-data".into()],
            total_records: Some(1250),
            ..DataCatalog::new(vec![users])
        }
    }

    fn access_control() -> AccessControl {
        AccessControl {
            current_access: AccessLevel::Read,
            required_permissions: vec!["api.read".into()],
            request_access_url: Some("https://developer.company.com/keys".to_string()),
            access_policies: vec![
                AccessPolicy {
                    name: "API Key Access".to_string(),
                    description: "Standard access with an API key".to_string(),
                    conditions: vec!["Registered developer account".to_string()],
                    granted_by: "API Platform Team".to_string(),
                },
                AccessPolicy {
                    name: "OAuth Access".to_string(),
                    description: "Delegated user access via OAuth 2.0".to_string(),
                    conditions: vec!["Approved OAuth client".to_string()],
                    granted_by: "Security Team".to_string(),
                },
            ],
            audit_log: true,
        }
    }

    fn request(&self, parameters: &Parameters) -> Result<Value, DomainError> {
        validate_parameters(parameters, &["endpoint"])?;
        let path = required_string_param(parameters, "endpoint")?;
        let method = match string_param(parameters, "method")? {
            Some(m) => HttpMethod::parse(m)
                .ok_or_else(|| DomainError::invalid_input(format!("Unsupported method: {}", m)))?,
            None => HttpMethod::Get,
        };

        let endpoint = self
            .core
            .endpoints()
            .iter()
            .find(|e| e.matches(path, method))
            .ok_or_else(|| {
                DomainError::not_found(format!("Endpoint '{} {}' not found", method, path))
            })?;

        // Path parameters are bound by the template; the rest must come in `query`.
        let query = parameters.get("query").and_then(Value::as_object);
        let missing: Vec<&str> = endpoint
            .required_parameters()
            .into_iter()
            .filter(|name| !endpoint.path.contains(&format!(":{}", name)))
            .filter(|name| !query.map_or(false, |q| q.contains_key(*name)))
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::missing_parameters(missing));
        }

        if path == "/v2/users" && method == HttpMethod::Get {
            let rows = self.core.sample_data("users-endpoint", usize::MAX)?;
            return Ok(json!({
                "data": rows,
                "pagination": {"page": 1, "per_page": 20, "total": 1250, "total_pages": 63}
            }));
        }

        Ok(json!({
            "success": true,
            "endpoint": path,
            "method": method,
            "query": query.cloned().map(Value::Object).unwrap_or(Value::Null),
            "body": parameters.get("body").cloned().unwrap_or(Value::Null),
            "timestamp": Utc::now().to_rfc3339(),
        }))
    }
}

#[async_trait]
impl Connector for ApiConnector {
    fn core(&self) -> &ConnectorCore {
        &self.core
    }

    async fn execute(&self, operation: &str, parameters: &Parameters) -> Result<Value, DomainError> {
        match operation {
            "request" => self.request(parameters),
            _ => Err(DomainError::unknown_operation(operation)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(value: Value) -> Parameters {
        match value {
            Value::Object(map) => map,
            _ => Parameters::new(),
        }
    }

    #[test]
    fn test_identity_and_upcoming_breaking_changes() {
        let api = ApiConnector::new("Customer", "https://api.company.com/", "Customer API");

        assert_eq!(api.system_id(), "api-customer");
        assert_eq!(api.base_url(), "https://api.company.com");
        assert!(api.metadata().version.has_breaking_changes_ahead());
        assert_eq!(api.endpoints().len(), 4);
    }

    #[tokio::test]
    async fn test_users_page() {
        let api = ApiConnector::new("Customer", "https://api.company.com", "");

        let result = api
            .execute("request", &params(json!({"endpoint": "/v2/users"})))
            .await
            .unwrap();

        assert_eq!(result["data"].as_array().map(Vec::len), Some(2));
        assert_eq!(result["pagination"]["total"], 1250);
    }

    #[tokio::test]
    async fn test_templated_endpoint() {
        let api = ApiConnector::new("Customer", "https://api.company.com", "");

        let result = api
            .execute("request", &params(json!({"endpoint": "/v2/users/7", "method": "get"})))
            .await
            .unwrap();

        assert_eq!(result["success"], true);
        assert_eq!(result["method"], "GET");
    }

    #[tokio::test]
    async fn test_required_query_parameters() {
        let api = ApiConnector::new("Customer", "https://api.company.com", "");

        let err = api
            .execute("request", &params(json!({"endpoint": "/v2/products/search"})))
            .await
            .unwrap_err();
        assert_eq!(err.missing_parameter_names(), ["q"]);

        let result = api
            .execute(
                "request",
                &params(json!({"endpoint": "/v2/products/search", "query": {"q": "lamp"}})),
            )
            .await
            .unwrap();
        assert_eq!(result["query"]["q"], "lamp");
    }

    #[tokio::test]
    async fn test_undeclared_endpoint_is_not_found() {
        let api = ApiConnector::new("Customer", "https://api.company.com", "");

        let err = api
            .execute("request", &params(json!({"endpoint": "/v2/orders"})))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_request_requires_endpoint() {
        let api = ApiConnector::new("Customer", "https://api.company.com", "");

        let err = api.execute("request", &Parameters::new()).await.unwrap_err();
        assert_eq!(err.missing_parameter_names(), ["endpoint"]);

        let err = api.execute("fetch", &Parameters::new()).await.unwrap_err();
        assert!(err.is_invalid_input());
    }
}
