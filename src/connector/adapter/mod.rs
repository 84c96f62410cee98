mod api_connector;
mod crm_connector;
mod database_connector;
mod file_connector;
mod in_memory_system_registry;

pub use api_connector::*;
pub use crm_connector::*;
pub use database_connector::*;
pub use file_connector::*;
pub use in_memory_system_registry::*;
