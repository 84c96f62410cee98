//! # Connector Layer
//!
//! Concrete systems and the registry that holds them:
//! - Example connectors for a database, a REST API, a file store, and a CRM
//! - In-memory system registry
//! - CLI-facing container, router, and controllers

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
