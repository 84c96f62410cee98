mod connector;
mod system_registry;

pub use connector::*;
pub use system_registry::*;
