//! # Salgspuls Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Spreadsheet store client (values API over HTTP)
//! - Order-portal lookup client (browser-function service)
//! - Configuration loading
//! - Background sync scheduling
//!
//! ## Architecture
//! - Implements traits defined in `salgspuls-core`
//! - Depends on `salgspuls-domain` and `salgspuls-core`
//! - Contains all "impure" code (I/O, HTTP)

pub mod config;
pub mod errors;
pub mod http;
pub mod orders;
pub mod scheduling;
pub mod sheets;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::HttpClient;
pub use orders::PortalClient;
pub use scheduling::{SyncScheduler, SyncSchedulerConfig};
pub use sheets::{GoalSheetRepository, SheetsClient};
