mod datasets_controller;
mod execute_controller;
mod health_controller;
mod systems_controller;

pub use datasets_controller::DatasetsController;
pub use execute_controller::ExecuteController;
pub use health_controller::HealthController;
pub use systems_controller::SystemsController;
