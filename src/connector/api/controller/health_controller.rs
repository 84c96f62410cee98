use anyhow::Result;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::domain::HealthStatus;

use super::super::Container;

pub struct HealthController<'a> {
    container: &'a Container,
}

impl<'a> HealthController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn health(&self, format: OutputFormat) -> Result<String> {
        let results = self.container.health_use_case().execute().await;

        Ok(match format {
            OutputFormat::Json => {
                let entries: Vec<_> = results
                    .iter()
                    .map(|(system_id, status)| json!({"system_id": system_id, "health": status}))
                    .collect();
                serde_json::to_string_pretty(&entries)?
            }
            OutputFormat::Text => self.format_health(&results),
        })
    }

    fn format_health(&self, results: &[(String, HealthStatus)]) -> String {
        if results.is_empty() {
            return "No systems registered.".to_string();
        }

        let mut output = String::new();
        for (system_id, status) in results {
            output.push_str(&format!(
                "{:<24} {:<10} {:>6}ms  {}\n",
                system_id,
                status.status.as_str(),
                status.response_time_ms,
                status.details.as_deref().unwrap_or("")
            ));
        }

        output
    }
}
