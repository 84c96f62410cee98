use anyhow::Result;

use crate::cli::OutputFormat;
use crate::domain::Dataset;

use super::super::Container;

pub struct DatasetsController<'a> {
    container: &'a Container,
}

impl<'a> DatasetsController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn datasets(
        &self,
        system_id: String,
        query: Option<String>,
        format: OutputFormat,
    ) -> Result<String> {
        let use_case = self.container.browse_use_case();
        let datasets = match query {
            Some(query) => use_case.search(&system_id, &query, None).await?,
            None => use_case.datasets(&system_id).await?,
        };

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&datasets)?,
            OutputFormat::Text => self.format_datasets(&system_id, &datasets),
        })
    }

    pub async fn schema(&self, system_id: String, dataset_id: String) -> Result<String> {
        let schema = self
            .container
            .browse_use_case()
            .schema(&system_id, &dataset_id)
            .await?;
        Ok(serde_json::to_string_pretty(&schema)?)
    }

    pub async fn sample(&self, system_id: String, dataset_id: String, limit: usize) -> Result<String> {
        let rows = self
            .container
            .browse_use_case()
            .sample(&system_id, &dataset_id, limit)
            .await?;
        Ok(serde_json::to_string_pretty(&rows)?)
    }

    fn format_datasets(&self, system_id: &str, datasets: &[Dataset]) -> String {
        if datasets.is_empty() {
            return format!("No datasets found in {}.", system_id);
        }

        let mut output = format!("Datasets in {}:\n\n", system_id);
        for dataset in datasets {
            output.push_str(&format!("  {} ({})\n", dataset.name, dataset.id));
            output.push_str(&format!("    {}\n", dataset.description));
            output.push_str(&format!("    Location: {}\n", dataset.location));
            if let Some(count) = dataset.record_count {
                output.push_str(&format!("    Records: {}\n", count));
            }
            output.push_str(&format!(
                "    Quality: {:.0}/100, Fields: {}\n",
                dataset.quality.score,
                dataset.schema.fields.len()
            ));
            let pii: Vec<&str> = dataset.schema.pii_fields().map(|f| f.name.as_str()).collect();
            if !pii.is_empty() {
                output.push_str(&format!("    PII: {}\n", pii.join(", ")));
            }
            output.push('\n');
        }

        output
    }
}
