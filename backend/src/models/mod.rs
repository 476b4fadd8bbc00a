//! Domain models for the Egg Sales Management backend
//!
//! Re-exports the shared vocabulary; row types live with their services.

pub use shared::models::*;
