//! Configuration structures
//!
//! Loaded once at process start (see `salgspuls-infra::config`) and treated
//! as read-only thereafter.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MONTHLY_GOAL, DEFAULT_SYNC_INTERVAL_SECS};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub sheet: SheetConfig,
    pub portal: PortalConfig,
    pub sync: SyncConfig,
    #[serde(default)]
    pub goals: GoalConfig,
}

/// Spreadsheet store (the makeshift database).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Spreadsheet document identifier
    pub spreadsheet_id: String,
    /// Bearer token used for the values API
    pub api_token: String,
    /// A1 range of the sales tab data rows
    #[serde(default = "default_sales_range")]
    pub sales_range: String,
    /// A1 range of the goals tab data rows
    #[serde(default = "default_goals_range")]
    pub goals_range: String,
}

/// Order-management portal the scraper logs into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Browser-function service endpoint
    pub endpoint: String,
    pub api_key: String,
    pub site: String,
    pub username: String,
    pub password: String,
}

/// Order auto-sync schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_sync_interval")]
    pub interval_seconds: u64,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Monthly goal defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalConfig {
    /// Fallback when a salesperson has no explicit goal
    #[serde(default = "default_goal")]
    pub default_goal: f64,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self { default_goal: DEFAULT_MONTHLY_GOAL }
    }
}

fn default_sales_range() -> String {
    "SALG (INPUT) v2!A2:N1000".to_string()
}

fn default_goals_range() -> String {
    "MAAL!A2:B100".to_string()
}

fn default_sync_interval() -> u64 {
    DEFAULT_SYNC_INTERVAL_SECS
}

fn default_goal() -> f64 {
    DEFAULT_MONTHLY_GOAL
}

fn default_true() -> bool {
    true
}
