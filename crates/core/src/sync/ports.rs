//! Port interfaces for order auto-sync

use std::collections::HashSet;

use async_trait::async_trait;
use salgspuls_domain::{OrderDetails, OrderListItem, Result, SyncedOrder};

/// Trait for the external order-management portal.
///
/// Errors propagate as failures; "order not found" is an explicit `None`,
/// never an error and never a silent empty result.
#[async_trait]
pub trait OrderDirectory: Send + Sync {
    /// Most recent orders from the portal's list page.
    async fn fetch_recent_orders(&self) -> Result<Vec<OrderListItem>>;

    /// Full details for one order, or `None` if the portal does not know it.
    async fn lookup_order(&self, order_id: &str) -> Result<Option<OrderDetails>>;

    /// Every order the portal has on file for the customer, any age.
    async fn search_customer_orders(&self, customer: &str) -> Result<Vec<OrderListItem>>;
}

/// Trait for the sales log side of auto-sync.
#[async_trait]
pub trait SalesLog: Send + Sync {
    /// Order ids already present in the sales log.
    async fn existing_order_ids(&self) -> Result<HashSet<String>>;

    /// Append one resolved order as a new sales row.
    async fn append_synced_order(&self, order: &SyncedOrder) -> Result<()>;
}
