use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Environment, HealthState, SystemMetadata, SystemType};

/// Optional narrowing applied on top of a registry text query.
///
/// Tag and category filters match when any one of their entries is present on the system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemFilter {
    system_type: Option<SystemType>,
    tags: Option<Vec<String>>,
    categories: Option<Vec<String>>,
}

impl SystemFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, system_type: SystemType) -> Self {
        self.system_type = Some(system_type);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    pub fn system_type(&self) -> Option<SystemType> {
        self.system_type
    }

    pub fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }

    pub fn categories(&self) -> Option<&[String]> {
        self.categories.as_deref()
    }

    pub fn matches(&self, metadata: &SystemMetadata) -> bool {
        let type_ok = self
            .system_type
            .map_or(true, |ty| metadata.system_type == ty);
        let tags_ok = self
            .tags
            .as_ref()
            .map_or(true, |tags| tags.iter().any(|t| metadata.has_tag(t)));
        let categories_ok = self
            .categories
            .as_ref()
            .map_or(true, |cats| cats.iter().any(|c| metadata.has_category(c)));

        type_ok && tags_ok && categories_ok
    }
}

/// Empty query matches everything; otherwise a case-insensitive substring of
/// display name, system name, or description.
pub fn metadata_matches_query(metadata: &SystemMetadata, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let lower = query.to_lowercase();
    metadata.system_name.to_lowercase().contains(&lower)
        || metadata.display_name.to_lowercase().contains(&lower)
        || metadata.description.to_lowercase().contains(&lower)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStatistics {
    pub total_systems: usize,
    pub by_type: BTreeMap<SystemType, usize>,
    pub by_environment: BTreeMap<Environment, usize>,
    pub healthy_systems: usize,
    pub unhealthy_systems: usize,
}

impl RegistryStatistics {
    /// Single pass over `(metadata, current health)` pairs.
    ///
    /// Degraded and unknown systems count toward the totals but neither health bucket.
    pub fn collect<'a, I>(systems: I) -> Self
    where
        I: IntoIterator<Item = (&'a SystemMetadata, HealthState)>,
    {
        let mut stats = Self::default();

        for (metadata, health) in systems {
            stats.total_systems += 1;
            *stats.by_type.entry(metadata.system_type).or_insert(0) += 1;
            *stats.by_environment.entry(metadata.environment).or_insert(0) += 1;

            match health {
                HealthState::Healthy => stats.healthy_systems += 1,
                HealthState::Unhealthy => stats.unhealthy_systems += 1,
                HealthState::Degraded | HealthState::Unknown => {}
            }
        }

        stats
    }

    pub fn count_of_type(&self, system_type: SystemType) -> usize {
        self.by_type.get(&system_type).copied().unwrap_or(0)
    }

    pub fn count_in_environment(&self, environment: Environment) -> usize {
        self.by_environment.get(&environment).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{utc_date, ContactInfo, Documentation, VersionInfo};

    fn metadata(id: &str, system_type: SystemType, tags: &[&str], categories: &[&str]) -> SystemMetadata {
        SystemMetadata {
            system_id: id.to_string(),
            system_name: id.to_string(),
            display_name: format!("{} Display", id),
            system_type,
            description: "Holds the ledger".to_string(),
            version: VersionInfo::new("1.0.0", utc_date(2024, 1, 1)),
            owner: ContactInfo::new("Platform", "platform@company.com"),
            documentation: Documentation::new("overview"),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            environment: Environment::Production,
            region: None,
            data_centers: vec![],
            compliance: vec![],
            custom_metadata: Default::default(),
        }
    }

    #[test]
    fn test_query_matching() {
        let meta = metadata("billing", SystemType::Database, &[], &[]);

        assert!(metadata_matches_query(&meta, ""));
        assert!(metadata_matches_query(&meta, "BILL"));
        assert!(metadata_matches_query(&meta, "display"));
        assert!(metadata_matches_query(&meta, "ledger"));
        assert!(!metadata_matches_query(&meta, "inventory"));
    }

    #[test]
    fn test_filter_tags_any_match() {
        let meta = metadata("billing", SystemType::Database, &["sql", "finance"], &["core"]);

        assert!(SystemFilter::new().with_tags(["nosql", "finance"]).matches(&meta));
        assert!(!SystemFilter::new().with_tags(["nosql"]).matches(&meta));
        assert!(!SystemFilter::new().with_tags(["fin"]).matches(&meta));
    }

    #[test]
    fn test_filter_conditions_are_anded() {
        let meta = metadata("billing", SystemType::Database, &["sql"], &["core"]);

        let filter = SystemFilter::new()
            .with_type(SystemType::Database)
            .with_tags(["sql"])
            .with_categories(["core", "edge"]);
        assert!(filter.matches(&meta));

        let filter = filter.with_type(SystemType::Crm);
        assert!(!filter.matches(&meta));
    }

    #[test]
    fn test_statistics_empty() {
        let stats = RegistryStatistics::collect(std::iter::empty());

        assert_eq!(stats, RegistryStatistics::default());
        assert_eq!(stats.total_systems, 0);
        assert!(stats.by_type.is_empty());
    }

    #[test]
    fn test_statistics_health_buckets() {
        let a = metadata("a", SystemType::Database, &[], &[]);
        let b = metadata("b", SystemType::RestApi, &[], &[]);
        let c = metadata("c", SystemType::Database, &[], &[]);

        let stats = RegistryStatistics::collect([
            (&a, HealthState::Healthy),
            (&b, HealthState::Unhealthy),
            (&c, HealthState::Degraded),
        ]);

        assert_eq!(stats.total_systems, 3);
        assert_eq!(stats.count_of_type(SystemType::Database), 2);
        assert_eq!(stats.count_of_type(SystemType::RestApi), 1);
        assert_eq!(stats.count_in_environment(Environment::Production), 3);
        assert_eq!(stats.healthy_systems, 1);
        assert_eq!(stats.unhealthy_systems, 1);
    }
}
