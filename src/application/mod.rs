//! # Application Layer
//!
//! The connector and registry contracts, plus the use cases that drive them.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
