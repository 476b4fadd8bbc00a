//! Domain models shared across the system

mod audit;
mod category;

pub use audit::AuditAction;
pub use category::EggCategory;
