//! # Salgspuls Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Workday calendar math and budget pacing
//! - Salesperson alias matching and customer-name similarity
//! - Meeting-to-sale reconciliation
//! - Leaderboard aggregation and goal overviews
//! - Customer retention lookup
//! - Order auto-sync orchestration
//!
//! ## Architecture Principles
//! - Only depends on `salgspuls-domain`
//! - No spreadsheet, HTTP, or scraper code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod calendar;
pub mod goals;
pub mod leaderboard;
pub mod matching;
pub mod pacing;
pub mod reconcile;
pub mod retention;
pub mod sync;

// Re-export specific items to avoid ambiguity
pub use calendar::{workdays_elapsed, workdays_in_month};
pub use goals::{GoalRepository, GoalService};
pub use leaderboard::{recent_sales, LeaderboardAggregator};
pub use matching::{similarity, AliasTable};
pub use pacing::pace;
pub use reconcile::ports::MeetingRepository;
pub use reconcile::MeetingReconciler;
pub use retention::RetentionChecker;
pub use sync::ports::{OrderDirectory, SalesLog};
pub use sync::OrderSyncService;
