//! Leaderboard aggregation
//!
//! Folds the raw sale/meeting stream into per-person totals for a time
//! window and attaches pacing metrics per person. The pass is read-only over
//! the records; noisy rows (unknown sellers) are dropped, not rejected,
//! because historical sheet data is expected to contain junk.

use std::collections::HashMap;

use chrono::NaiveDate;
use salgspuls_domain::{Leaderboard, LeaderboardEntry, Result, SaleRecord, TimeWindow};
use tracing::{debug, instrument};

use crate::matching::AliasTable;
use crate::pacing::pace;

#[derive(Default)]
struct Totals {
    db: f64,
    meetings: u32,
    retention: f64,
}

/// Aggregates sale records into a per-person leaderboard.
pub struct LeaderboardAggregator {
    aliases: AliasTable,
    default_goal: f64,
}

impl LeaderboardAggregator {
    pub fn new(aliases: AliasTable, default_goal: f64) -> Self {
        Self { aliases, default_goal }
    }

    /// Fold `records` into per-person totals for the window ending at `today`.
    ///
    /// Every person in the alias table appears in the output, zeroed when
    /// they have no records in the window. Records before the window start or
    /// with unattributable sellers contribute nothing. Entries come back
    /// sorted by db descending.
    #[instrument(skip(self, records, goals_by_person), fields(records = records.len()))]
    pub fn aggregate(
        &self,
        records: &[SaleRecord],
        window: TimeWindow,
        today: NaiveDate,
        goals_by_person: &HashMap<String, f64>,
    ) -> Result<Leaderboard> {
        let window_start = window.start(today);

        let mut totals: HashMap<&str, Totals> = HashMap::new();
        for person in self.aliases.people() {
            totals.insert(person, Totals::default());
        }

        let mut dropped = 0_usize;
        for record in records {
            if record.date < window_start {
                continue;
            }
            let Some(person) = self.aliases.canonicalize(&record.raw_seller_name) else {
                dropped += 1;
                continue;
            };
            let entry = totals.entry(person).or_default();
            entry.db += record.amount;
            if record.is_meeting {
                entry.meetings += 1;
            }
            if record.is_retention {
                entry.retention += record.amount;
            }
        }
        if dropped > 0 {
            debug!(dropped, "dropped records with unattributable sellers");
        }

        let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(totals.len());
        for person in self.aliases.people() {
            let Some(sums) = totals.get(person) else { continue };
            let goal = effective_goal(goals_by_person.get(person).copied(), self.default_goal);
            let pacing = pace(sums.db.max(0.0), goal, today)?;
            entries.push(LeaderboardEntry {
                name: person.to_string(),
                db: sums.db,
                meetings: sums.meetings,
                retention: sums.retention,
                goal_progress: sums.db / goal * 100.0,
                pacing,
            });
        }

        entries.sort_by(|a, b| b.db.partial_cmp(&a.db).unwrap_or(std::cmp::Ordering::Equal));

        let total_db = entries.iter().map(|e| e.db).sum();
        let total_meetings = entries.iter().map(|e| e.meetings).sum();
        let total_retention = entries.iter().map(|e| e.retention).sum();

        Ok(Leaderboard { entries, total_db, total_meetings, total_retention })
    }
}

/// A missing or non-positive stored goal falls back to the configured default.
pub(crate) fn effective_goal(stored: Option<f64>, default_goal: f64) -> f64 {
    match stored {
        Some(goal) if goal > 0.0 => goal,
        _ => default_goal,
    }
}

/// Last `limit` sale rows, newest first (input-form confirmation list).
///
/// Meetings without revenue are included; the sheet row index is the
/// recency order.
pub fn recent_sales(records: &[SaleRecord], limit: usize) -> Vec<SaleRecord> {
    let mut sorted: Vec<SaleRecord> = records.to_vec();
    sorted.sort_by(|a, b| b.row.cmp(&a.row));
    sorted.truncate(limit);
    sorted
}
