//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Goal configuration
pub const DEFAULT_MONTHLY_GOAL: f64 = 100_000.0;

// Meeting reconciliation
pub const DEFAULT_LOOKBACK_DAYS: i64 = 90;
pub const MATCH_SCORE_THRESHOLD: f64 = 0.3;
pub const LIKELY_SCORE: f64 = 0.5;
pub const VERY_LIKELY_SCORE: f64 = 0.8;
pub const SUBSTRING_MATCH_SCORE: f64 = 0.8;
// Tokens must be strictly longer than this to take part in overlap scoring
pub const MIN_SCORED_TOKEN_LEN: usize = 2;

// Customer retention
// A previous order older than this no longer counts as retention
pub const RETENTION_WINDOW_MONTHS: u32 = 24;

// Spreadsheet cell conventions
pub const SHEET_EPOCH_UNIX_OFFSET_DAYS: i64 = 25_569;
pub const FLAG_CELL_TRUE: &str = "JA";

// Sales tab column layout (zero-based cell indices within a row)
pub const COL_DATE: usize = 0;
pub const COL_SELLER: usize = 1;
pub const COL_ORDER_ID: usize = 2;
pub const COL_CUSTOMER: usize = 3;
pub const COL_DB: usize = 10;
pub const COL_MEETING: usize = 12;
pub const COL_RETENTION: usize = 13;

// Order auto-sync configuration
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 1_800;
pub const SYNC_LOOKUP_DELAY_MS: u64 = 2_000;
