//! End-to-end flow: logged meetings -> candidate search -> link -> stats

mod support;

use std::sync::Arc;

use salgspuls_core::{AliasTable, MeetingReconciler};
use salgspuls_domain::MatchConfidence;
use support::{date, InMemorySheet, RowBuilder};

fn aliases() -> AliasTable {
    AliasTable::new(vec![("Niels Larsen".into(), vec!["niels".into()]), ("Frank".into(), vec![])])
        .unwrap()
}

#[tokio::test]
async fn sale_finds_earlier_meeting_and_converts_it() {
    let sheet = Arc::new(InMemorySheet::new(vec![
        RowBuilder::meeting(2, date(2024, 2, 20), "Niels", "Acme A/S").build(),
        RowBuilder::meeting(3, date(2024, 3, 5), "Niels", "Globex Inc").build(),
        RowBuilder::meeting(4, date(2024, 3, 8), "Frank", "Acme A/S").build(),
    ]));
    let reconciler = MeetingReconciler::new(Arc::clone(&sheet) as _, aliases());
    let today = date(2024, 3, 21);

    // A sale for "Acme Holding" by Niels comes in
    let candidates = reconciler.find_candidates("niels", "Acme Holding", today).await.unwrap();

    // Only Niels' Acme meeting qualifies: Frank's is another seller and
    // Globex shares no tokens with the sale's customer
    assert_eq!(candidates.len(), 1);
    let best = &candidates[0];
    assert_eq!(best.meeting_row, 2);
    assert_eq!(best.confidence, MatchConfidence::Likely);
    assert!(!best.converted);

    // The caller picks the match; the reconciler writes the link back
    reconciler.link(best.meeting_row, "1042").await.unwrap();

    let stats = reconciler.conversion_stats().await.unwrap();
    assert_eq!(stats.total_meetings, 3);
    assert_eq!(stats.converted, 1);
    assert!((stats.conversion_rate - 100.0 / 3.0).abs() < 1e-9);

    // The converted meeting no longer shows up for later sales
    let candidates = reconciler.find_candidates("Niels", "Acme Holding", today).await.unwrap();
    assert!(candidates.is_empty());

    // The link landed on the right row
    let rows = sheet.records();
    assert_eq!(rows.iter().find(|r| r.row == 2).unwrap().linked_order_id.as_deref(), Some("1042"));
    assert!(rows.iter().find(|r| r.row == 3).unwrap().linked_order_id.is_none());
}

#[tokio::test]
async fn lookback_window_is_configurable() {
    let sheet = Arc::new(InMemorySheet::new(vec![
        RowBuilder::meeting(2, date(2024, 1, 5), "Niels", "Acme A/S").build(),
    ]));
    let today = date(2024, 3, 21);

    let strict = MeetingReconciler::new(Arc::clone(&sheet) as _, aliases()).with_lookback_days(30);
    assert!(strict.find_candidates("Niels", "Acme A/S", today).await.unwrap().is_empty());

    let default = MeetingReconciler::new(Arc::clone(&sheet) as _, aliases());
    assert_eq!(default.find_candidates("Niels", "Acme A/S", today).await.unwrap().len(), 1);
}
