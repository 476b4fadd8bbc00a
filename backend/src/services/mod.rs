//! Business logic services for the Egg Sales Management system

pub mod audit;
pub mod customer;
pub mod pricing;
pub mod reporting;
pub mod stock;
pub mod transaction;

pub use audit::AuditService;
pub use customer::CustomerService;
pub use pricing::PricingService;
pub use reporting::ReportingService;
pub use stock::StockService;
pub use transaction::TransactionService;
