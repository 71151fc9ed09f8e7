//! Port interfaces for meeting reconciliation

use async_trait::async_trait;
use salgspuls_domain::{Result, SaleRecord};

/// Trait for reading meeting rows and writing conversion links.
///
/// Backed by the spreadsheet store in production. There is no locking and no
/// optimistic-concurrency token at this boundary: two concurrent linkers can
/// both land their writes and the last one wins (accepted limitation of the
/// source design).
#[async_trait]
pub trait MeetingRepository: Send + Sync {
    /// All rows flagged as meetings, in sheet order.
    async fn list_meetings(&self) -> Result<Vec<SaleRecord>>;

    /// Write an order id onto the meeting's row, marking it converted.
    async fn write_order_link(&self, meeting_row: usize, order_id: &str) -> Result<()>;
}
