//! # Domain Layer
//!
//! The entity model describing backend systems, the error taxonomy, and the
//! default connector behaviour. Independent of any concrete backend.

mod error;
pub mod models;
pub mod services;

pub use error::*;
pub use models::*;
pub use services::*;
