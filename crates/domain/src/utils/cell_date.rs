//! Spreadsheet date-cell parsing
//!
//! Date cells arrive in one of two shapes depending on how the row was
//! entered: a numeric day-count in the spreadsheet epoch (day 0 is
//! 1899-12-30) or a `DD-MM-YYYY` string. Both must parse identically.

use chrono::NaiveDate;
use serde_json::Value;

use crate::constants::SHEET_EPOCH_UNIX_OFFSET_DAYS;

/// Parse a raw date cell into a calendar date.
///
/// Returns `None` for any unrecognized shape; the caller skips the row.
pub fn parse_cell_date(cell: &Value) -> Option<NaiveDate> {
    match cell {
        Value::Number(n) => n.as_f64().and_then(from_serial),
        Value::String(s) => parse_dmy(s),
        _ => None,
    }
}

/// Convert a spreadsheet serial day-count to a date.
///
/// `serial - 25569` is the day offset from the Unix epoch (1970-01-01).
pub fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = (serial as i64) - SHEET_EPOCH_UNIX_OFFSET_DAYS;
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(chrono::Duration::days(days))
}

/// Parse a `DD-MM-YYYY` string.
pub fn parse_dmy(text: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = text.trim().split('-').collect();
    if parts.len() != 3 {
        return None;
    }
    let day: u32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let year: i32 = parts[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
