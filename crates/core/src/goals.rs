//! Monthly goal management
//!
//! Goals default to a fixed amount until an admin overrides them; overrides
//! persist keyed by canonical salesperson name. The overview feeds the admin
//! goal editor: each person's stored goal plus live pacing against it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use salgspuls_domain::{GoalOverview, Leaderboard, Result, SalgspulsError};
use tracing::{info, instrument};

use crate::leaderboard::effective_goal;
use crate::pacing::pace;

/// Trait for persisting monthly goal overrides.
#[async_trait]
pub trait GoalRepository: Send + Sync {
    /// All stored overrides keyed by canonical salesperson name.
    async fn fetch_goals(&self) -> Result<std::collections::HashMap<String, f64>>;

    /// Persist one override (insert or replace).
    async fn update_goal(&self, name: &str, amount: f64) -> Result<()>;
}

/// Goal lookup and admin operations.
pub struct GoalService {
    repository: Arc<dyn GoalRepository>,
    default_goal: f64,
}

impl GoalService {
    pub fn new(repository: Arc<dyn GoalRepository>, default_goal: f64) -> Self {
        Self { repository, default_goal }
    }

    /// Stored goal overrides; people without one fall back to the default.
    pub async fn goals(&self) -> Result<std::collections::HashMap<String, f64>> {
        self.repository.fetch_goals().await
    }

    /// Persist a goal override.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a non-positive amount or blank name.
    #[instrument(skip(self))]
    pub async fn set_goal(&self, name: &str, amount: f64) -> Result<()> {
        if name.trim().is_empty() {
            return Err(SalgspulsError::InvalidInput("salesperson name is empty".into()));
        }
        if amount <= 0.0 {
            return Err(SalgspulsError::InvalidInput(format!(
                "goal must be positive, got {amount}"
            )));
        }
        self.repository.update_goal(name.trim(), amount).await?;
        info!(name, amount, "updated monthly goal");
        Ok(())
    }

    /// Admin overview: stored (or default) goal plus pacing per person on the
    /// current monthly leaderboard.
    pub async fn overview(&self, board: &Leaderboard, today: NaiveDate) -> Result<Vec<GoalOverview>> {
        let stored = self.repository.fetch_goals().await?;

        let mut overview = Vec::with_capacity(board.entries.len());
        for entry in &board.entries {
            let goal = effective_goal(stored.get(&entry.name).copied(), self.default_goal);
            let pacing = pace(entry.db.max(0.0), goal, today)?;
            overview.push(GoalOverview { name: entry.name.clone(), goal, actual: entry.db, pacing });
        }
        Ok(overview)
    }
}
