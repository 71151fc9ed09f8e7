//! Order auto-sync
//!
//! Periodically imports sales from the order-management portal: diff the
//! portal's recent-order list against order ids already in the sales log,
//! look up each new order's details and append it. One bad order is recorded
//! in the report and skipped; it never aborts the run.

pub mod ports;

use std::sync::Arc;
use std::time::Duration;

use salgspuls_domain::constants::SYNC_LOOKUP_DELAY_MS;
use salgspuls_domain::{Result, SyncReport, SyncedOrder};
use tracing::{info, instrument, warn};

use ports::{OrderDirectory, SalesLog};

/// Orchestrates one auto-sync pass against the portal and the sales log.
pub struct OrderSyncService {
    directory: Arc<dyn OrderDirectory>,
    log: Arc<dyn SalesLog>,
    lookup_delay: Duration,
}

impl OrderSyncService {
    pub fn new(directory: Arc<dyn OrderDirectory>, log: Arc<dyn SalesLog>) -> Self {
        Self { directory, log, lookup_delay: Duration::from_millis(SYNC_LOOKUP_DELAY_MS) }
    }

    /// Override the inter-lookup delay (rate-limit courtesy; zero in tests).
    pub fn with_lookup_delay(mut self, delay: Duration) -> Self {
        self.lookup_delay = delay;
        self
    }

    /// Run one sync pass.
    ///
    /// Collaborator failures on the two initial fetches are hard errors;
    /// per-order lookup/append failures land in `SyncReport::errors`.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<SyncReport> {
        info!("starting order auto-sync");

        let existing = self.log.existing_order_ids().await?;
        let recent = self.directory.fetch_recent_orders().await?;

        let new_orders: Vec<_> =
            recent.iter().filter(|order| !existing.contains(&order.order_id)).collect();

        let mut report = SyncReport {
            existing_orders: existing.len(),
            fetched_orders: recent.len(),
            new_orders: new_orders.len(),
            ..SyncReport::default()
        };

        if new_orders.is_empty() {
            info!("no new orders to sync");
            return Ok(report);
        }

        for (index, order) in new_orders.iter().enumerate() {
            if index > 0 && !self.lookup_delay.is_zero() {
                tokio::time::sleep(self.lookup_delay).await;
            }

            match self.directory.lookup_order(&order.order_id).await {
                Ok(Some(details)) => {
                    let synced = SyncedOrder {
                        order_id: details.order_id,
                        customer: details.customer,
                        db: details.db,
                        salesrep: details.salesrep,
                        date: order.date.clone(),
                    };
                    match self.log.append_synced_order(&synced).await {
                        Ok(()) => report.synced_orders += 1,
                        Err(err) => {
                            warn!(order_id = %order.order_id, error = %err, "append failed");
                            report.errors.push(format!("order {}: {err}", order.order_id));
                        }
                    }
                }
                Ok(None) => {
                    warn!(order_id = %order.order_id, "order details not found");
                    report.errors.push(format!("order {}: details not found", order.order_id));
                }
                Err(err) => {
                    warn!(order_id = %order.order_id, error = %err, "lookup failed");
                    report.errors.push(format!("order {}: {err}", order.order_id));
                }
            }
        }

        info!(
            synced = report.synced_orders,
            new = report.new_orders,
            errors = report.errors.len(),
            "order auto-sync finished"
        );
        Ok(report)
    }
}
