use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{DatasetsController, ExecuteController, HealthController, SystemsController};

pub struct Router<'a> {
    systems_controller: SystemsController<'a>,
    datasets_controller: DatasetsController<'a>,
    execute_controller: ExecuteController<'a>,
    health_controller: HealthController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            systems_controller: SystemsController::new(container),
            datasets_controller: DatasetsController::new(container),
            execute_controller: ExecuteController::new(container),
            health_controller: HealthController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::List { format } => self.systems_controller.list(format).await,
            Commands::Search {
                query,
                system_type,
                tags,
                categories,
                format,
            } => {
                self.systems_controller
                    .search(query, system_type, tags, categories, format)
                    .await
            }
            Commands::Show { system_id } => self.systems_controller.show(system_id).await,
            Commands::Datasets {
                system_id,
                query,
                format,
            } => {
                self.datasets_controller
                    .datasets(system_id, query, format)
                    .await
            }
            Commands::Schema {
                system_id,
                dataset_id,
            } => self.datasets_controller.schema(system_id, dataset_id).await,
            Commands::Sample {
                system_id,
                dataset_id,
                limit,
            } => {
                self.datasets_controller
                    .sample(system_id, dataset_id, limit)
                    .await
            }
            Commands::Execute {
                system_id,
                operation,
                params,
            } => {
                self.execute_controller
                    .execute(system_id, operation, params)
                    .await
            }
            Commands::Health { format } => self.health_controller.health(format).await,
            Commands::Stats { format } => self.systems_controller.stats(format).await,
        }
    }
}
