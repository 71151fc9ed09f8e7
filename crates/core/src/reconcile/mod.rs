//! Meeting-to-sale reconciliation
//!
//! When a sale lands, earlier logged meetings for the same salesperson are
//! searched for a customer-name match so the meeting can be marked as
//! converted. A meeting moves `Unconverted -> Converted` exactly once in
//! effect; re-linking the same meeting overwrites the order id
//! (last-write-wins, see [`ports::MeetingRepository`]).

pub mod ports;

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use salgspuls_domain::constants::{DEFAULT_LOOKBACK_DAYS, MATCH_SCORE_THRESHOLD};
use salgspuls_domain::{MatchConfidence, MeetingCandidate, MeetingConversionStats, Result};
use tracing::{info, instrument};

use crate::matching::{similarity, AliasTable};
use ports::MeetingRepository;

/// Finds and links unconverted meetings for new sales.
pub struct MeetingReconciler {
    repository: Arc<dyn MeetingRepository>,
    aliases: AliasTable,
    lookback_days: i64,
}

impl MeetingReconciler {
    /// Create a reconciler with the default 90-day lookback window.
    pub fn new(repository: Arc<dyn MeetingRepository>, aliases: AliasTable) -> Self {
        Self { repository, aliases, lookback_days: DEFAULT_LOOKBACK_DAYS }
    }

    /// Override the lookback window (tests and backfills).
    pub fn with_lookback_days(mut self, days: i64) -> Self {
        self.lookback_days = days;
        self
    }

    /// Candidate meetings for a new sale, best match first.
    ///
    /// Filters to the sale's canonical salesperson, drops converted meetings,
    /// meetings without a customer name and meetings older than the lookback
    /// window, scores the rest against the sale's customer name and keeps
    /// scores at or above the 0.3 threshold. The sort is stable, so equal
    /// scores keep sheet order. An unattributable salesperson yields no
    /// candidates rather than an error.
    #[instrument(skip(self))]
    pub async fn find_candidates(
        &self,
        salesperson: &str,
        customer_name: &str,
        today: NaiveDate,
    ) -> Result<Vec<MeetingCandidate>> {
        let Some(canonical) = self.aliases.canonicalize(salesperson) else {
            return Ok(Vec::new());
        };
        let cutoff = today - Duration::days(self.lookback_days);

        let meetings = self.repository.list_meetings().await?;

        let mut candidates: Vec<MeetingCandidate> = meetings
            .iter()
            .filter(|meeting| self.aliases.canonicalize(&meeting.raw_seller_name) == Some(canonical))
            .filter(|meeting| !meeting.is_converted())
            .filter(|meeting| meeting.date >= cutoff)
            .filter_map(|meeting| {
                let meeting_customer = meeting.customer_name.as_deref()?.trim();
                if meeting_customer.is_empty() {
                    return None;
                }
                let score = similarity(customer_name, meeting_customer);
                if score < MATCH_SCORE_THRESHOLD {
                    return None;
                }
                Some(MeetingCandidate {
                    meeting_row: meeting.row,
                    date: meeting.date,
                    customer_name: meeting_customer.to_string(),
                    match_score: score,
                    confidence: MatchConfidence::from_score(score),
                    converted: false,
                })
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.match_score.partial_cmp(&a.match_score).unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(candidates)
    }

    /// Link a sale's order id to a meeting row, marking it converted.
    ///
    /// Safe to call on an already-converted meeting: the link is overwritten.
    /// The caller records the sale separately; a failure here must not roll
    /// that back (the two writes are deliberately non-transactional).
    #[instrument(skip(self))]
    pub async fn link(&self, meeting_row: usize, order_id: &str) -> Result<()> {
        self.repository.write_order_link(meeting_row, order_id).await?;
        info!(meeting_row, order_id, "linked sale to meeting");
        Ok(())
    }

    /// Conversion numbers across all meetings.
    pub async fn conversion_stats(&self) -> Result<MeetingConversionStats> {
        let meetings = self.repository.list_meetings().await?;
        let total = meetings.len() as u32;
        let converted = meetings.iter().filter(|m| m.is_converted()).count() as u32;
        let conversion_rate =
            if total == 0 { 0.0 } else { f64::from(converted) / f64::from(total) * 100.0 };
        Ok(MeetingConversionStats { total_meetings: total, converted, conversion_rate })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use salgspuls_domain::SaleRecord;

    use super::*;

    struct InMemoryMeetings {
        meetings: Mutex<Vec<SaleRecord>>,
    }

    impl InMemoryMeetings {
        fn new(meetings: Vec<SaleRecord>) -> Self {
            Self { meetings: Mutex::new(meetings) }
        }
    }

    #[async_trait]
    impl MeetingRepository for InMemoryMeetings {
        async fn list_meetings(&self) -> Result<Vec<SaleRecord>> {
            Ok(self.meetings.lock().unwrap().clone())
        }

        async fn write_order_link(&self, meeting_row: usize, order_id: &str) -> Result<()> {
            let mut meetings = self.meetings.lock().unwrap();
            for meeting in meetings.iter_mut() {
                if meeting.row == meeting_row {
                    meeting.linked_order_id = Some(order_id.to_string());
                }
            }
            Ok(())
        }
    }

    fn meeting(row: usize, date: (i32, u32, u32), seller: &str, customer: &str) -> SaleRecord {
        SaleRecord {
            row,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            raw_seller_name: seller.to_string(),
            amount: 0.0,
            is_meeting: true,
            is_retention: false,
            customer_name: if customer.is_empty() { None } else { Some(customer.to_string()) },
            linked_order_id: None,
        }
    }

    fn aliases() -> AliasTable {
        AliasTable::new(vec![("Niels Larsen".into(), vec!["niels".into()]), ("Frank".into(), vec![])])
            .unwrap()
    }

    fn reconciler(meetings: Vec<SaleRecord>) -> MeetingReconciler {
        MeetingReconciler::new(Arc::new(InMemoryMeetings::new(meetings)), aliases())
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 21).unwrap()
    }

    #[tokio::test]
    async fn candidates_are_scored_and_sorted_descending() {
        let reconciler = reconciler(vec![
            meeting(2, (2024, 3, 1), "Niels", "Acme Holding"),
            meeting(3, (2024, 3, 5), "Niels", "Acme A/S"),
            meeting(4, (2024, 3, 7), "Niels", "Globex Inc"),
        ]);

        let candidates = reconciler.find_candidates("Niels", "Acme A/S", today()).await.unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].meeting_row, 3);
        assert_eq!(candidates[0].match_score, 1.0);
        assert_eq!(candidates[0].confidence, MatchConfidence::VeryLikely);
        assert_eq!(candidates[1].meeting_row, 2);
        assert!(candidates[1].match_score >= 0.3);
    }

    #[tokio::test]
    async fn equal_scores_keep_sheet_order() {
        let reconciler = reconciler(vec![
            meeting(2, (2024, 3, 1), "Niels", "Acme A/S"),
            meeting(3, (2024, 3, 5), "Niels", "Acme A/S"),
        ]);

        let candidates = reconciler.find_candidates("Niels", "Acme A/S", today()).await.unwrap();
        assert_eq!(candidates.iter().map(|c| c.meeting_row).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[tokio::test]
    async fn other_sellers_meetings_are_excluded() {
        let reconciler = reconciler(vec![
            meeting(2, (2024, 3, 1), "Frank", "Acme A/S"),
            meeting(3, (2024, 3, 5), "Niels", "Acme A/S"),
        ]);

        let candidates = reconciler.find_candidates("niels", "Acme A/S", today()).await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].meeting_row, 3);
    }

    #[tokio::test]
    async fn converted_and_nameless_meetings_are_excluded() {
        let mut converted = meeting(2, (2024, 3, 1), "Niels", "Acme A/S");
        converted.linked_order_id = Some("1001".into());
        let reconciler = reconciler(vec![converted, meeting(3, (2024, 3, 5), "Niels", "")]);

        let candidates = reconciler.find_candidates("Niels", "Acme A/S", today()).await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn meetings_beyond_lookback_are_excluded() {
        let reconciler = reconciler(vec![
            meeting(2, (2023, 11, 1), "Niels", "Acme A/S"),
            meeting(3, (2024, 3, 5), "Niels", "Acme A/S"),
        ]);

        let candidates = reconciler.find_candidates("Niels", "Acme A/S", today()).await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].meeting_row, 3);
    }

    #[tokio::test]
    async fn unknown_salesperson_yields_no_candidates() {
        let reconciler = reconciler(vec![meeting(2, (2024, 3, 1), "Niels", "Acme A/S")]);
        let candidates = reconciler.find_candidates("Ukendt", "Acme A/S", today()).await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn linking_twice_is_idempotent_in_effect() {
        let store = Arc::new(InMemoryMeetings::new(vec![meeting(2, (2024, 3, 1), "Niels", "Acme")]));
        let reconciler = MeetingReconciler::new(Arc::clone(&store) as _, aliases());

        reconciler.link(2, "1001").await.unwrap();
        reconciler.link(2, "1001").await.unwrap();

        let meetings = store.list_meetings().await.unwrap();
        assert_eq!(meetings[0].linked_order_id.as_deref(), Some("1001"));

        let stats = reconciler.conversion_stats().await.unwrap();
        assert_eq!(stats.converted, 1);
    }

    #[tokio::test]
    async fn relinking_overwrites_last_write_wins() {
        let store = Arc::new(InMemoryMeetings::new(vec![meeting(2, (2024, 3, 1), "Niels", "Acme")]));
        let reconciler = MeetingReconciler::new(Arc::clone(&store) as _, aliases());

        reconciler.link(2, "1001").await.unwrap();
        reconciler.link(2, "2002").await.unwrap();

        let meetings = store.list_meetings().await.unwrap();
        assert_eq!(meetings[0].linked_order_id.as_deref(), Some("2002"));
    }

    #[tokio::test]
    async fn conversion_stats_with_no_meetings_is_zero_rate() {
        let reconciler = reconciler(vec![]);
        let stats = reconciler.conversion_stats().await.unwrap();
        assert_eq!(stats.total_meetings, 0);
        assert_eq!(stats.conversion_rate, 0.0);
    }
}
