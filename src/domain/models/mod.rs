mod access;
mod catalog;
mod discovery;
mod endpoint;
mod health;
mod operation;
mod system_metadata;

pub use access::*;
pub use catalog::*;
pub use discovery::*;
pub use endpoint::*;
pub use health::*;
pub use operation::*;
pub use system_metadata::*;
