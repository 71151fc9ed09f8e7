//! Common data types used throughout the application

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::constants::{LIKELY_SCORE, VERY_LIKELY_SCORE};

/// One parsed row of the sales tab.
///
/// A row with `is_meeting == true` and `amount == 0.0` is a pure meeting log
/// entry with no revenue attached yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRecord {
    /// 1-based row index in the sales tab (stable storage address)
    pub row: usize,
    pub date: NaiveDate,
    pub raw_seller_name: String,
    /// Net profit (DB) in kroner, not revenue
    pub amount: f64,
    pub is_meeting: bool,
    pub is_retention: bool,
    pub customer_name: Option<String>,
    /// Present once a meeting has been converted into a sale
    pub linked_order_id: Option<String>,
}

impl SaleRecord {
    /// A meeting counts as converted once an order id has been written back.
    pub fn is_converted(&self) -> bool {
        self.linked_order_id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }
}

/// Aggregation window for the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Daily,
    Monthly,
    Yearly,
}

impl TimeWindow {
    /// First date included in the window, given the injected "today".
    pub fn start(self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => today,
            Self::Monthly => {
                NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today)
            }
            Self::Yearly => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
        }
    }
}

/// Derived pacing metrics for one salesperson and month.
///
/// Recomputed on every query, never stored. Monetary fields are rounded to
/// whole kroner; ratio-like fields are left unrounded for presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    pub workdays_in_month: u32,
    pub workdays_elapsed: u32,
    pub workdays_remaining: u32,
    pub daily_target: f64,
    pub expected_to_date: f64,
    pub actual: f64,
    /// `actual - expected_to_date`; negative means behind pace
    pub variance: f64,
    pub is_under_pace: bool,
    /// Kroner per remaining workday needed to still hit the goal. When no
    /// workdays remain this is the raw shortfall `goal - actual`.
    pub required_daily_run_rate: f64,
}

/// Display bucket for a meeting match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchConfidence {
    VeryLikely,
    Likely,
    Possible,
}

impl MatchConfidence {
    /// Bucket a similarity score. Thresholds are load-bearing for existing
    /// behaviour and must not drift.
    pub fn from_score(score: f64) -> Self {
        if score >= VERY_LIKELY_SCORE {
            Self::VeryLikely
        } else if score >= LIKELY_SCORE {
            Self::Likely
        } else {
            Self::Possible
        }
    }
}

/// One candidate meeting that a new sale could be linked back to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingCandidate {
    /// Row of the originating meeting in the sales tab
    pub meeting_row: usize,
    pub date: NaiveDate,
    pub customer_name: String,
    /// Similarity score in [0, 1]
    pub match_score: f64,
    pub confidence: MatchConfidence,
    pub converted: bool,
}

/// Per-person leaderboard entry with attached pacing metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    /// Net profit (DB) total for the window
    pub db: f64,
    pub meetings: u32,
    /// Revenue from retention-flagged sales
    pub retention: f64,
    /// `(db / goal) * 100`, unrounded
    pub goal_progress: f64,
    pub pacing: BudgetSnapshot,
}

/// Leaderboard for one window: entries sorted by db descending plus totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    pub total_db: f64,
    pub total_meetings: u32,
    pub total_retention: f64,
}

/// Aggregate meeting conversion numbers across the whole sales tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingConversionStats {
    pub total_meetings: u32,
    pub converted: u32,
    /// Percent in [0, 100]; 0 when there are no meetings
    pub conversion_rate: f64,
}

/// Admin view: one salesperson's goal with current pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalOverview {
    pub name: String,
    pub goal: f64,
    pub actual: f64,
    pub pacing: BudgetSnapshot,
}

/// Full order details as returned by the order portal detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order_id: String,
    pub customer: String,
    pub db: f64,
    pub salesrep: String,
}

/// One row of the order portal's recent-order list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderListItem {
    pub order_id: String,
    pub customer: String,
    pub db: f64,
    /// Raw date text from the portal list; passed through unparsed
    pub date: String,
}

/// Outcome of a customer retention lookup against the order portal.
///
/// `previous_order_count` counts every order on file; the date and day-count
/// fields are `None` when no order carries a readable date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionCheck {
    pub is_retention: bool,
    pub previous_order_date: Option<NaiveDate>,
    pub previous_order_count: u32,
    pub days_since_last_order: Option<i64>,
}

/// An order resolved during auto-sync, ready to append to the sales log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncedOrder {
    pub order_id: String,
    pub customer: String,
    pub db: f64,
    pub salesrep: String,
    pub date: String,
}

/// Outcome of one auto-sync run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncReport {
    pub existing_orders: usize,
    pub fetched_orders: usize,
    pub new_orders: usize,
    pub synced_orders: usize,
    /// Per-order failures; a bad order never aborts the run
    pub errors: Vec<String>,
}
