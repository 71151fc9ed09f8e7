//! Customer retention lookup
//!
//! When a sale is being registered, the customer's order history in the
//! portal decides whether the retention flag applies: a previous order within
//! the last 24 months counts as retention, older history or a clean record
//! does not. The lookup is advisory; the sheet's retention flag cell remains
//! whatever the salesperson enters.

use std::sync::Arc;

use chrono::{Months, NaiveDate};
use salgspuls_domain::constants::RETENTION_WINDOW_MONTHS;
use salgspuls_domain::{parse_dmy, Result, RetentionCheck, SalgspulsError};
use tracing::instrument;

use crate::sync::ports::OrderDirectory;

/// Answers "has this customer bought from us before, and recently enough?".
pub struct RetentionChecker {
    directory: Arc<dyn OrderDirectory>,
}

impl RetentionChecker {
    pub fn new(directory: Arc<dyn OrderDirectory>) -> Self {
        Self { directory }
    }

    /// Check a customer against the portal's order history.
    ///
    /// Orders with unreadable or future dates still count toward the order
    /// total but cannot anchor the retention window; a history consisting
    /// only of such orders is treated as not-retention.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a blank customer name; portal failures
    /// propagate unchanged.
    #[instrument(skip(self))]
    pub async fn check(&self, customer: &str, today: NaiveDate) -> Result<RetentionCheck> {
        let customer = customer.trim();
        if customer.is_empty() {
            return Err(SalgspulsError::InvalidInput("customer name is empty".into()));
        }

        let history = self.directory.search_customer_orders(customer).await?;
        let previous_order_count = history.len() as u32;

        let last_order = history
            .iter()
            .filter_map(|order| parse_dmy(&order.date))
            .filter(|date| *date <= today)
            .max();

        let Some(last_order) = last_order else {
            return Ok(RetentionCheck {
                is_retention: false,
                previous_order_date: None,
                previous_order_count,
                days_since_last_order: None,
            });
        };

        let is_retention = today
            .checked_sub_months(Months::new(RETENTION_WINDOW_MONTHS))
            .map_or(true, |cutoff| last_order >= cutoff);

        Ok(RetentionCheck {
            is_retention,
            previous_order_date: Some(last_order),
            previous_order_count,
            days_since_last_order: Some((today - last_order).num_days()),
        })
    }
}
