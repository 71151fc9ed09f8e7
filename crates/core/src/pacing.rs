//! Budget pacing
//!
//! Pro-rates a monthly goal linearly across the month's workdays and compares
//! the expected-to-date value against the actual total. "Today" is injected
//! rather than read from a global clock so the calculation stays testable and
//! safe to call concurrently.

use chrono::{Datelike, NaiveDate};
use salgspuls_domain::{BudgetSnapshot, Result, SalgspulsError};

use crate::calendar::{workdays_elapsed, workdays_in_month};

/// Compute pacing metrics for one salesperson's month.
///
/// Monetary outputs are rounded to whole kroner. Division by zero never
/// propagates: a zero-workday month yields zero targets, and when no
/// workdays remain the required run rate is the raw shortfall `goal - actual`
/// rather than a division (preserved reference behaviour).
///
/// # Errors
/// Returns `InvalidInput` if `goal` is not positive or `actual` is negative.
pub fn pace(actual: f64, goal: f64, today: NaiveDate) -> Result<BudgetSnapshot> {
    if goal <= 0.0 {
        return Err(SalgspulsError::InvalidInput(format!("goal must be positive, got {goal}")));
    }
    if actual < 0.0 {
        return Err(SalgspulsError::InvalidInput(format!(
            "actual must be non-negative, got {actual}"
        )));
    }

    let total = workdays_in_month(today.year(), today.month());
    let elapsed = workdays_elapsed(today.year(), today.month(), today.day());
    let remaining = total.saturating_sub(elapsed);

    // Cannot happen for a real calendar month, but the contract forbids a
    // division-by-zero from ever escaping.
    let daily_target = if total == 0 { 0.0 } else { goal / f64::from(total) };
    let expected_to_date = daily_target * f64::from(elapsed);
    let variance = actual - expected_to_date;

    let required_daily_run_rate = if remaining == 0 {
        goal - actual
    } else {
        (goal - actual) / f64::from(remaining)
    };

    Ok(BudgetSnapshot {
        workdays_in_month: total,
        workdays_elapsed: elapsed,
        workdays_remaining: remaining,
        daily_target: daily_target.round(),
        expected_to_date: expected_to_date.round(),
        actual,
        variance: variance.round(),
        is_under_pace: variance < 0.0,
        required_daily_run_rate: required_daily_run_rate.round(),
    })
}
