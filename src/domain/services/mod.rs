//! Domain services: behaviour shared by every connector.

mod connector_core;

pub use connector_core::*;
