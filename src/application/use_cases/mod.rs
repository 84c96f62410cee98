mod browse_datasets;
mod check_health;
mod discover_systems;
mod execute_operation;

pub use browse_datasets::*;
pub use check_health::*;
pub use discover_systems::*;
pub use execute_operation::*;
