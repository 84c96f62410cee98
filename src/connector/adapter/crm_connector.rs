use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::application::Connector;
use crate::domain::{
    system_slug, utc_date, AccessControl, AccessLevel, ConnectorCore, ContactInfo, DataCatalog,
    DataQuality, DataSchema, Dataset, Documentation, DocumentationExample, DomainError, Endpoint,
    Environment, FaqItem, HttpMethod, Parameters, SchemaField, SystemMetadata, SystemType,
    VersionInfo,
};

pub const DEFAULT_CRM_API_URL: &str = "http://localhost:3001/graphql";

/// Entities the CRM manages, as (dataset id, operation suffix).
const ENTITIES: [(&str, &str); 4] = [
    ("contacts", "Contacts"),
    ("companies", "Companies"),
    ("deals", "Deals"),
    ("tasks", "Tasks"),
];

/// CRM system reached over GraphQL.
///
/// Operations are acknowledged without calling the CRM.
pub struct CrmConnector {
    core: ConnectorCore,
    api_url: String,
}

impl CrmConnector {
    pub fn new(name: &str, api_url: &str, description: &str) -> Self {
        let metadata = SystemMetadata {
            system_id: format!("crm-{}", system_slug(name)),
            system_name: name.to_string(),
            display_name: name.to_string(),
            system_type: SystemType::Crm,
            description: description.to_string(),
            version: VersionInfo::new("1.0.0", utc_date(2024, 12, 1)),
            owner: ContactInfo::new("Sales Operations Team", "sales-ops@company.com")
                .with_slack("#sales-ops"),
            documentation: Documentation {
                getting_started: Some(
                    "Access the CRM through the access layer or directly via its GraphQL API.".to_string(),
                ),
                api_reference: Some(
                    "GraphQL API for contacts, companies, deals, and tasks.".to_string(),
                ),
                examples: vec![DocumentationExample {
                    title: "Query Contacts".to_string(),
                    description: "Fetch contacts with a limit".to_string(),
                    code: r#"connector.execute("getContacts", {"limit": 10})"#.to_string(),
                    language: "json".to_string(),
                }],
                faq: vec![FaqItem {
                    question: "How do I add a new contact?".to_string(),
                    answer: "Run the createContact operation.".to_string(),
                }],
                ..Documentation::new(format!(
                    "{} is a CRM system for managing customer relationships, the sales pipeline, and business development activities.",
                    name
                ))
            },
            tags: ["crm", "contacts", "sales", "deals", "tasks", "pipeline"]
                .into_iter()
                .map(String::from)
                .collect(),
            categories: vec!["CRM".into(), "Sales".into(), "Customer Management".into()],
            environment: Environment::Production,
            region: Some("us-east-1".to_string()),
            data_centers: Vec::new(),
            compliance: vec!["GDPR".into(), "SOC2".into()],
            custom_metadata: Default::default(),
        };

        let core = ConnectorCore::new(metadata)
            .with_endpoints(Self::endpoints())
            .with_catalog(Self::catalog(api_url))
            .with_access_control(
                AccessControl {
                    required_permissions: vec!["crm.read".into()],
                    ..AccessControl::new(AccessLevel::Read)
                }
                .with_audit_log(true),
            );

        Self {
            core,
            api_url: api_url.to_string(),
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

    pub fn with_access_level(mut self, level: AccessLevel) -> Self {
        let access = AccessControl {
            current_access: level,
            ..self.core.access_control().clone()
        };
        self.core = self.core.with_access_control(access);
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn endpoints() -> Vec<Endpoint> {
        let mut endpoints = vec![Endpoint::new(
            "/graphql",
            HttpMethod::Post,
            "GraphQL API endpoint for all CRM operations",
        )
        .with_authentication(&["Bearer Token"])
        .with_rate_limit(1000, "1h")];

        endpoints.extend(ENTITIES.iter().map(|(id, _)| {
            Endpoint::new(format!("/api/{}", id), HttpMethod::Get, format!("Get all {}", id))
                .with_authentication(&["Bearer Token"])
        }));
        endpoints
    }

    fn catalog(api_url: &str) -> DataCatalog {
        let dataset = |id: &str, name: &str, description: &str, fields: Vec<SchemaField>, records: u64, score: f64| {
            let issues = if score < 90.0 {
                vec![
                    "Some records missing phone numbers".to_string(),
                    "Duplicate email addresses detected".to_string(),
                ]
            } else {
                Vec::new()
            };
            Dataset::new(
                id,
                name,
                description,
                DataSchema::new(id, description, fields).with_primary_key(&["id"]),
                format!("{}/{}", api_url, id),
                "Sales Team",
            )
            .with_format("GraphQL")
            .with_record_count(records)
            .with_update_frequency("real-time")
            .with_quality(DataQuality::new(score, score, (score + 2.0).min(100.0)).with_issues(issues))
        };

        let contacts = dataset(
            "contacts",
            "Contacts",
            "People the sales team works with",
            vec![
                SchemaField::new("id", "string", false, "Unique contact identifier"),
                SchemaField::new("name", "string", false, "Full name").with_pii(),
                SchemaField::new("email", "string", true, "Email address").with_pii(),
                SchemaField::new("phone", "string", true, "Phone number").with_pii(),
                SchemaField::new("companyId", "string", true, "Employer"),
            ],
            2847,
            87.0,
        )
        .with_tags(&["contacts", "people", "leads"]);

        let companies = dataset(
            "companies",
            "Companies",
            "Organizations in the sales pipeline",
            vec![
                SchemaField::new("id", "string", false, "Unique company identifier"),
                SchemaField::new("name", "string", false, "Company name"),
                SchemaField::new("domainName", "string", true, "Web domain"),
                SchemaField::new("employees", "integer", true, "Headcount"),
            ],
            512,
            93.0,
        )
        .with_tags(&["companies", "accounts", "organizations"]);

        let deals = dataset(
            "deals",
            "Deals",
            "Sales opportunities and their stages",
            vec![
                SchemaField::new("id", "string", false, "Unique deal identifier"),
                SchemaField::new("name", "string", false, "Deal name"),
                SchemaField::new("amount", "decimal", true, "Deal value"),
                SchemaField::new("stage", "string", false, "Pipeline stage"),
            ],
            1289,
            95.0,
        )
        .with_tags(&["deals", "opportunities", "pipeline"]);

        let tasks = dataset(
            "tasks",
            "Tasks",
            "CRM tasks and activities",
            vec![
                SchemaField::new("id", "string", false, "Unique task identifier"),
                SchemaField::new("title", "string", false, "Task title"),
                SchemaField::new("status", "string", false, "Task status (pending, completed)"),
                SchemaField::new("dueDate", "date", true, "Due date"),
            ],
            423,
            91.0,
        )
        .with_tags(&["tasks", "activities", "follow-ups"]);

        DataCatalog {
            tags: vec!["crm".into(), "sales".into()],
            categories: vec!["CRM".into()],
            total_records: Some(2847 + 512 + 1289 + 423),
            ..DataCatalog::new(vec![contacts, companies, deals, tasks])
        }
    }

    /// Splits `getContacts` / `createDeal` style names into verb and entity id.
    fn parse_operation(operation: &str) -> Option<(&'static str, &'static str)> {
        for verb in ["get", "create", "update", "delete"] {
            let Some(rest) = operation.strip_prefix(verb) else {
                continue;
            };
            for (id, plural) in ENTITIES {
                let singular = plural.strip_suffix("ies").map_or_else(
                    || plural.strip_suffix('s').unwrap_or(plural).to_string(),
                    |stem| format!("{}y", stem),
                );
                if rest == plural || rest == singular {
                    return Some((verb, id));
                }
            }
        }
        None
    }
}

#[async_trait]
impl Connector for CrmConnector {
    fn core(&self) -> &ConnectorCore {
        &self.core
    }

    async fn execute(&self, operation: &str, parameters: &Parameters) -> Result<Value, DomainError> {
        let (verb, entity) =
            Self::parse_operation(operation).ok_or_else(|| DomainError::unknown_operation(operation))?;

        Ok(json!({
            "success": true,
            "operation": operation,
            "action": verb,
            "entity": entity,
            "parameters": parameters,
            "message": "CRM operation acknowledged",
        }))
    }

    /// The GraphQL URL must at least be an http(s) URL.
    async fn probe(&self) -> Result<(), DomainError> {
        if self.api_url.starts_with("http://") || self.api_url.starts_with("https://") {
            Ok(())
        } else {
            Err(DomainError::backend(format!(
                "CRM API URL '{}' is not an http(s) URL",
                self.api_url
            )))
        }
    }

    /// Default matching, narrowed to the dataset ids listed under `datasets`.
    ///
    /// A `datasets` value that is not an array is ignored; non-string ids are skipped.
    async fn search(&self, query: &str, filters: Option<&Parameters>) -> Vec<Dataset> {
        let wanted: Option<Vec<&str>> = match filters.and_then(|f| f.get("datasets")) {
            Some(Value::Array(ids)) => Some(ids.iter().filter_map(Value::as_str).collect()),
            _ => None,
        };

        self.core
            .search_datasets(query)
            .into_iter()
            .filter(|d| wanted.as_ref().map_or(true, |ids| ids.contains(&d.id.as_str())))
            .collect()
    }
}
