//! # Salgspuls Domain
//!
//! Business domain types and models for Salgspuls.
//!
//! This crate contains:
//! - Domain data types (SaleRecord, BudgetSnapshot, MeetingCandidate, etc.)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants and cell-parsing utilities
//!
//! ## Architecture
//! - No dependencies on other Salgspuls crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
// Re-export cell parsing utilities
pub use utils::cell_date::{parse_cell_date, parse_dmy};
pub use utils::currency::{format_kroner, parse_kroner};
