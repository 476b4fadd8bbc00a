//! Shared types and models for the Egg Sales Management system
//!
//! This crate contains the domain vocabulary shared between the backend
//! and other components of the system: the category enumeration, audit
//! actions, pagination types, and field validation helpers.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
