//! Spreadsheet store adapters
//!
//! The spreadsheet doubles as the application's database: the sales tab holds
//! one row per sale or meeting, the goals tab holds per-person monthly goal
//! overrides. This module owns the cell-level encoding conventions and the
//! values-API client on top of them.

pub mod client;
pub mod codec;
pub mod goals;

pub use client::SheetsClient;
pub use goals::GoalSheetRepository;
