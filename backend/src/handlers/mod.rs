//! HTTP handlers for the Egg Sales Management API

pub mod audit;
pub mod customer;
pub mod health;
pub mod pricing;
pub mod reporting;
pub mod stock;
pub mod transaction;

pub use audit::*;
pub use customer::*;
pub use health::*;
pub use pricing::*;
pub use reporting::*;
pub use stock::*;
pub use transaction::*;
