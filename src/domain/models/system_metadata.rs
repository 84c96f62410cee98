use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Broad family a backend system belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemType {
    Database,
    RestApi,
    FileSystem,
    MessageQueue,
    Streaming,
    Legacy,
    Saas,
    Crm,
    Custom,
}

impl SystemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemType::Database => "database",
            SystemType::RestApi => "rest_api",
            SystemType::FileSystem => "file_system",
            SystemType::MessageQueue => "message_queue",
            SystemType::Streaming => "streaming",
            SystemType::Legacy => "legacy",
            SystemType::Saas => "saas",
            SystemType::Crm => "crm",
            SystemType::Custom => "custom",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "database" | "db" => Some(SystemType::Database),
            "rest_api" | "rest" | "api" => Some(SystemType::RestApi),
            "file_system" | "file" | "files" => Some(SystemType::FileSystem),
            "message_queue" | "queue" => Some(SystemType::MessageQueue),
            "streaming" => Some(SystemType::Streaming),
            "legacy" => Some(SystemType::Legacy),
            "saas" => Some(SystemType::Saas),
            "crm" => Some(SystemType::Crm),
            "custom" => Some(SystemType::Custom),
            _ => None,
        }
    }
}

impl std::fmt::Display for SystemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deployment environment a system runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Production,
    Staging,
    Development,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Development => "development",
            Environment::Test => "test",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Some(Environment::Production),
            "staging" | "stage" => Some(Environment::Staging),
            "development" | "dev" => Some(Environment::Development),
            "test" => Some(Environment::Test),
            _ => None,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingVersion {
    pub version: String,
    pub release_date: DateTime<Utc>,
    pub breaking_changes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub current: String,
    pub release_date: DateTime<Utc>,
    #[serde(default)]
    pub deprecated: bool,
    pub deprecation_date: Option<DateTime<Utc>>,
    pub next_version: Option<UpcomingVersion>,
}

impl VersionInfo {
    pub fn new(current: impl Into<String>, release_date: DateTime<Utc>) -> Self {
        Self {
            current: current.into(),
            release_date,
            deprecated: false,
            deprecation_date: None,
            next_version: None,
        }
    }

    pub fn with_next_version(mut self, next: UpcomingVersion) -> Self {
        self.next_version = Some(next);
        self
    }

    pub fn has_breaking_changes_ahead(&self) -> bool {
        self.next_version
            .as_ref()
            .is_some_and(|next| !next.breaking_changes.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub team: String,
    pub email: String,
    pub slack: Option<String>,
    pub phone: Option<String>,
    pub on_call_schedule: Option<String>,
}

impl ContactInfo {
    pub fn new(team: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            email: email.into(),
            slack: None,
            phone: None,
            on_call_schedule: None,
        }
    }

    pub fn with_slack(mut self, channel: impl Into<String>) -> Self {
        self.slack = Some(channel.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentationExample {
    pub title: String,
    pub description: String,
    pub code: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub version: String,
    pub date: DateTime<Utc>,
    pub changes: Vec<String>,
    pub breaking: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Documentation {
    pub overview: String,
    pub getting_started: Option<String>,
    pub api_reference: Option<String>,
    #[serde(default)]
    pub examples: Vec<DocumentationExample>,
    #[serde(default)]
    pub faq: Vec<FaqItem>,
    pub troubleshooting: Option<String>,
    #[serde(default)]
    pub changelog: Vec<ChangelogEntry>,
}

impl Documentation {
    pub fn new(overview: impl Into<String>) -> Self {
        Self {
            overview: overview.into(),
            ..Self::default()
        }
    }
}

/// Descriptive identity of a backend system.
///
/// `system_id` is the key a [`SystemRegistry`](crate::application::SystemRegistry)
/// stores the connector under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetadata {
    pub system_id: String,
    pub system_name: String,
    pub display_name: String,
    pub system_type: SystemType,
    pub description: String,
    pub version: VersionInfo,
    pub owner: ContactInfo,
    pub documentation: Documentation,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub environment: Environment,
    pub region: Option<String>,
    #[serde(default)]
    pub data_centers: Vec<String>,
    #[serde(default)]
    pub compliance: Vec<String>,
    #[serde(default)]
    pub custom_metadata: HashMap<String, Value>,
}

impl SystemMetadata {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} [{}] {} ({})",
            self.system_id, self.system_type, self.display_name, self.environment
        )
    }
}

/// Derives the id fragment used by connector constructors: lowercased, whitespace runs become `-`.
pub fn system_slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Midnight UTC on the given calendar day, or the epoch when the date does not exist.
pub fn utc_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_slug() {
        assert_eq!(system_slug("Customer DB"), "customer-db");
        assert_eq!(system_slug("  Sales   Data\tFeeds "), "sales-data-feeds");
        assert_eq!(system_slug("Twenty"), "twenty");
    }

    #[test]
    fn test_system_type_round_trip_through_str() {
        for ty in [
            SystemType::Database,
            SystemType::RestApi,
            SystemType::FileSystem,
            SystemType::MessageQueue,
            SystemType::Streaming,
            SystemType::Legacy,
            SystemType::Saas,
            SystemType::Crm,
            SystemType::Custom,
        ] {
            assert_eq!(SystemType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(SystemType::parse("mainframe"), None);
    }

    #[test]
    fn test_system_type_serializes_snake_case() {
        let json = serde_json::to_string(&SystemType::RestApi).unwrap();
        assert_eq!(json, "\"rest_api\"");
    }

    #[test]
    fn test_environment_aliases() {
        assert_eq!(Environment::parse("prod"), Some(Environment::Production));
        assert_eq!(Environment::parse("DEV"), Some(Environment::Development));
        assert_eq!(Environment::parse("qa"), None);
    }

    #[test]
    fn test_breaking_changes_ahead() {
        let version = VersionInfo::new("2.0.0", utc_date(2024, 1, 1));
        assert!(!version.has_breaking_changes_ahead());

        let version = version.with_next_version(UpcomingVersion {
            version: "3.0.0".to_string(),
            release_date: utc_date(2025, 1, 1),
            breaking_changes: vec!["Removed /v1 endpoints".to_string()],
        });
        assert!(version.has_breaking_changes_ahead());
    }

    #[test]
    fn test_utc_date_invalid_falls_back_to_epoch() {
        assert_eq!(utc_date(2024, 2, 30), DateTime::<Utc>::default());
        assert_eq!(utc_date(2024, 6, 15).to_rfc3339(), "2024-06-15T00:00:00+00:00");
    }
}
