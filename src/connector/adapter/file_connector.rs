use std::time::Duration;

use async_trait::async_trait;
use glob::Pattern;
use serde_json::{json, Value};

use crate::application::Connector;
use crate::domain::{
    required_string_param, string_param, system_slug, utc_date, validate_parameters,
    AccessControl, AccessLevel, AccessPolicy, ConnectorCore, ContactInfo, DataCatalog,
    DataQuality, DataSchema, Dataset, Documentation, DocumentationExample, DomainError, Endpoint,
    EndpointParameter, Environment, FaqItem, HttpMethod, Parameters, RetentionPolicy,
    SchemaField, SystemMetadata, SystemType, VersionInfo,
};

const DOWNLOAD_LINK_TTL_SECONDS: u64 = 3600;

/// Files known to every listed directory: (name, size in bytes, modified).
const LISTING: [(&str, u64, &str); 3] = [
    ("sales_data.csv", 1_048_576, "2024-06-15T01:00:00Z"),
    ("inventory_data.csv", 524_288, "2024-06-15T01:30:00Z"),
    ("customer_profiles.json", 262_144, "2024-06-15T02:00:00Z"),
];

/// File-based data feeds exposed through the access layer.
pub struct FileConnector {
    core: ConnectorCore,
    base_path: String,
}

impl FileConnector {
    pub fn new(system_name: &str, base_path: &str, description: &str) -> Self {
        let metadata = SystemMetadata {
            system_id: format!("file-{}", system_slug(system_name)),
            system_name: system_name.to_string(),
            display_name: format!("{} File System", system_name),
            system_type: SystemType::FileSystem,
            description: description.to_string(),
            version: VersionInfo::new("1.0.0", utc_date(2023, 1, 1)),
            owner: ContactInfo::new("Data Engineering Team", "data-eng@company.com")
                .with_slack("#data-engineering"),
            documentation: Documentation {
                getting_started: Some(
                    "Files are organized by date and data source. Use SFTP or the API for access."
                        .to_string(),
                ),
                examples: vec![
                    DocumentationExample {
                        title: "List Files".to_string(),
                        description: "Get CSV files for a specific date".to_string(),
                        code: r#"connector.execute("list", {"path": "/2024/06/15", "pattern": "*.csv"})"#
                            .to_string(),
                        language: "json".to_string(),
                    },
                    DocumentationExample {
                        title: "Download File".to_string(),
                        description: "Get a download link for a file".to_string(),
                        code: r#"connector.execute("download", {"path": "/2024/06/15/sales_data.csv"})"#
                            .to_string(),
                        language: "json".to_string(),
                    },
                ],
                faq: vec![
                    FaqItem {
                        question: "What file formats are supported?".to_string(),
                        answer: "CSV, JSON, Parquet, and Avro files are supported.".to_string(),
                    },
                    FaqItem {
                        question: "How long are files retained?".to_string(),
                        answer: "Files are retained for 90 days, then archived to cold storage."
                            .to_string(),
                    },
                ],
                ..Documentation::new(format!(
                    "{} is a file-based data storage system containing various data feeds.",
                    system_name
                ))
            },
            tags: vec!["files".into(), "data-feeds".into(), "batch-processing".into()],
            categories: vec!["data-storage".into(), "batch-data".into()],
            environment: Environment::Production,
            region: Some("us-east-1".to_string()),
            data_centers: Vec::new(),
            compliance: vec!["SOC2".into()],
            custom_metadata: Default::default(),
        };

        let base_path = base_path.trim_end_matches('/').to_string();
        let core = ConnectorCore::new(metadata)
            .with_endpoints(Self::endpoints())
            .with_catalog(Self::catalog(&base_path))
            .with_access_control(Self::access_control());

        Self { core, base_path }
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.core = self.core.with_probe_timeout(timeout);
        self
    }

    pub fn with_audit_log(mut self, enabled: bool) -> Self {
        self.core = self.core.with_audit_log(enabled);
        self
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    fn endpoints() -> Vec<Endpoint> {
        vec![
            Endpoint::new("/files/list", HttpMethod::Get, "List files in a directory").with_parameters(vec![
                EndpointParameter::required("path", "string", "Directory path"),
                EndpointParameter::optional("pattern", "string", "File name pattern", Some(json!("*"))),
            ]),
            Endpoint::new("/files/download", HttpMethod::Get, "Get a temporary download link")
                .with_parameters(vec![EndpointParameter::required("path", "string", "Full file path")])
                .with_rate_limit(50, "1m"),
            Endpoint::new("/files/schema", HttpMethod::Get, "Get schema information for a file")
                .with_parameters(vec![EndpointParameter::required("path", "string", "Full file path")])
                .with_response_schema(json!({"schema": {}})),
        ]
    }

    fn catalog(base_path: &str) -> DataCatalog {
        let sales = Dataset::new(
            "daily-sales-csv",
            "Daily Sales Data CSV",
            "Daily sales transaction files in CSV format",
            DataSchema::new(
                "sales_data",
                "Daily sales transactions",
                vec![
                    SchemaField::new("transaction_id", "string", false, "Unique transaction identifier")
                        .with_sample_values(vec![json!("TXN-2024-001"), json!("TXN-2024-002")]),
                    SchemaField::new("transaction_date", "string (YYYY-MM-DD)", false, "Date of transaction"),
                    SchemaField::new("customer_id", "integer", false, "Customer identifier"),
                    SchemaField::new("product_sku", "string", false, "Product SKU"),
                    SchemaField::new("quantity", "integer", false, "Quantity purchased"),
                    SchemaField::new("total_amount", "decimal", false, "Total transaction amount"),
                    SchemaField::new("store_id", "string", false, "Store identifier"),
                ],
            ),
            format!("{}/sales/daily/YYYY/MM/DD/sales_data.csv", base_path),
            "Sales Analytics Team",
        )
        .with_format("CSV")
        .with_size(1_048_576)
        .with_record_count(5000)
        .with_update_frequency("Daily at 1:00 AM")
        .with_quality(
            DataQuality::new(92.0, 95.0, 92.0).with_issues(vec!["Some records missing store_id".to_string()]),
        )
        .with_tags(&["sales", "transactions", "csv", "daily"])
        .with_sample_data(vec![
            json!({"transaction_id": "TXN-2024-001", "transaction_date": "2024-06-15", "customer_id": 12345, "product_sku": "PROD-001", "quantity": 2, "total_amount": 99.98, "store_id": "STORE-NYC-001"}),
            json!({"transaction_id": "TXN-2024-002", "transaction_date": "2024-06-15", "customer_id": 67890, "product_sku": "PROD-002", "quantity": 1, "total_amount": 129.99, "store_id": "STORE-LA-005"}),
        ]);

        let customers = Dataset::new(
            "customer-profiles-json",
            "Customer Profiles JSON",
            "Customer profile data in JSON format",
            DataSchema::new(
                "customer_profile",
                "Customer demographic and preference data",
                vec![
                    SchemaField::new("customer_id", "integer", false, "Unique customer identifier"),
                    SchemaField::new("email", "string", false, "Customer email").with_pii(),
                    SchemaField::new("preferences", "object", true, "Marketing preferences"),
                ],
            ),
            format!("{}/customers/profiles/customer_profiles.json", base_path),
            "Customer Data Team",
        )
        .with_format("JSON")
        .with_size(262_144)
        .with_record_count(50_000)
        .with_update_frequency("Weekly")
        .with_quality(DataQuality::new(88.0, 90.0, 88.0))
        .with_tags(&["customers", "profiles", "json", "pii"]);

        DataCatalog {
            tags: vec!["files".into(), "batch".into()],
            categories: vec!["batch-data".into()],
            total_records: Some(55_000),
            data_retention: Some(RetentionPolicy {
                policy: "Archive to cold storage".to_string(),
                duration: "90 days".to_string(),
            }),
            ..DataCatalog::new(vec![sales, customers])
        }
    }

    fn access_control() -> AccessControl {
        AccessControl {
            current_access: AccessLevel::Read,
            required_permissions: vec!["files.read".into()],
            request_access_url: Some("https://portal.company.com/access-requests".to_string()),
            access_policies: vec![AccessPolicy {
                name: "Read Access".to_string(),
                description: "Allows listing and downloading files".to_string(),
                conditions: vec!["User must be in data-consumers group".to_string()],
                granted_by: "Data Engineering Team".to_string(),
            }],
            audit_log: false,
        }
    }

    fn list(&self, path: &str, pattern: &str) -> Result<Value, DomainError> {
        let matcher = Pattern::new(pattern).map_err(|e| {
            DomainError::invalid_input(format!("Invalid file pattern '{}': {}", pattern, e))
        })?;

        let dir = path.trim_end_matches('/');
        let files: Vec<Value> = LISTING
            .iter()
            .filter(|(name, _, _)| matcher.matches(name))
            .map(|(name, size, modified)| {
                json!({
                    "name": name,
                    "size": size,
                    "modified": modified,
                    "path": format!("{}/{}", dir, name),
                })
            })
            .collect();
        let total_size: u64 = files.iter().filter_map(|f| f["size"].as_u64()).sum();

        Ok(json!({ "files": files, "total_size": total_size, "path": path }))
    }

    fn download(&self, path: &str) -> Result<Value, DomainError> {
        let filename = path
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| DomainError::invalid_input(format!("Path '{}' does not name a file", path)))?;

        Ok(json!({
            "url": format!(
                "https://files.company.com/download/{}?token=temp-token",
                path.trim_start_matches('/')
            ),
            "expires_in": DOWNLOAD_LINK_TTL_SECONDS,
            "filename": filename,
        }))
    }

    /// Schema of the dataset whose id prefix (text before the first `-`) appears in `path`.
    fn schema_for(&self, path: &str) -> Value {
        let schema = self.core.datasets().iter().find(|d| {
            let prefix = d.id.split('-').next().unwrap_or_default();
            !prefix.is_empty() && path.contains(prefix)
        });

        json!({
            "schema": schema.map(|d| &d.schema),
            "path": path,
        })
    }
}

#[async_trait]
impl Connector for FileConnector {
    fn core(&self) -> &ConnectorCore {
        &self.core
    }

    async fn execute(&self, operation: &str, parameters: &Parameters) -> Result<Value, DomainError> {
        if !matches!(operation, "list" | "download" | "schema") {
            return Err(DomainError::unknown_operation(operation));
        }
        validate_parameters(parameters, &["path"])?;
        let path = required_string_param(parameters, "path")?;

        match operation {
            "list" => {
                let pattern = string_param(parameters, "pattern")?.unwrap_or("*");
                self.list(path, pattern)
            }
            "download" => self.download(path),
            _ => Ok(self.schema_for(path)),
        }
    }
}
