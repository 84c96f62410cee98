use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::application::Connector;
use crate::cli::OutputFormat;
use crate::domain::{RegistryStatistics, SystemFilter, SystemType};

use super::super::Container;

pub struct SystemsController<'a> {
    container: &'a Container,
}

impl<'a> SystemsController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn list(&self, format: OutputFormat) -> Result<String> {
        let systems = self.container.discover_use_case().list();
        self.render_systems(&systems, format, "No systems registered.")
    }

    pub async fn search(
        &self,
        query: String,
        system_type: Option<String>,
        tags: Vec<String>,
        categories: Vec<String>,
        format: OutputFormat,
    ) -> Result<String> {
        let mut filter = SystemFilter::new();

        if let Some(raw) = system_type {
            let parsed = SystemType::parse(&raw)
                .ok_or_else(|| anyhow!("Unknown system type '{}'", raw))?;
            filter = filter.with_type(parsed);
        }

        if !tags.is_empty() {
            filter = filter.with_tags(tags);
        }

        if !categories.is_empty() {
            filter = filter.with_categories(categories);
        }

        let systems = self.container.discover_use_case().execute(&query, Some(&filter));
        self.render_systems(&systems, format, "No systems found.")
    }

    pub async fn show(&self, system_id: String) -> Result<String> {
        let system = self
            .container
            .discover_use_case()
            .get_by_id(&system_id)
            .ok_or_else(|| anyhow!("System '{}' not found", system_id))?;

        Ok(serde_json::to_string_pretty(&system.get_metadata().await)?)
    }

    pub async fn stats(&self, format: OutputFormat) -> Result<String> {
        let stats = self.container.discover_use_case().statistics();

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&stats)?,
            OutputFormat::Text => self.format_stats(&stats),
        })
    }

    fn render_systems(
        &self,
        systems: &[Arc<dyn Connector>],
        format: OutputFormat,
        empty_message: &str,
    ) -> Result<String> {
        if format == OutputFormat::Json {
            let metadata: Vec<_> = systems.iter().map(|s| s.metadata()).collect();
            return Ok(serde_json::to_string_pretty(&metadata)?);
        }

        if systems.is_empty() {
            return Ok(empty_message.to_string());
        }

        let mut output = format!("{} system(s):\n\n", systems.len());
        for system in systems {
            let metadata = system.metadata();
            output.push_str(&format!("  {}\n", metadata.summary()));
            output.push_str(&format!("    {}\n", metadata.description));
            output.push_str(&format!(
                "    Owner: {} <{}>\n",
                metadata.owner.team, metadata.owner.email
            ));
            if !metadata.tags.is_empty() {
                output.push_str(&format!("    Tags: {}\n", metadata.tags.join(", ")));
            }
            output.push_str(&format!("    Health: {}\n", system.health().status));
            output.push('\n');
        }

        Ok(output)
    }

    fn format_stats(&self, stats: &RegistryStatistics) -> String {
        let mut output = format!(
            "Registry Statistics\n===================\nSystems:   {}\nHealthy:   {}\nUnhealthy: {}\n",
            stats.total_systems, stats.healthy_systems, stats.unhealthy_systems
        );

        if !stats.by_type.is_empty() {
            output.push_str("\nBy type:\n");
            for (system_type, count) in &stats.by_type {
                output.push_str(&format!("  {:<16} {}\n", system_type.as_str(), count));
            }
        }

        if !stats.by_environment.is_empty() {
            output.push_str("\nBy environment:\n");
            for (environment, count) in &stats.by_environment {
                output.push_str(&format!("  {:<16} {}\n", environment.as_str(), count));
            }
        }

        output
    }
}
