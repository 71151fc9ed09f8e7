//! Row-level encoding for the sales tab
//!
//! The values API hands rows back as arrays of loosely typed JSON cells.
//! Column positions are fixed by the tab layout; everything beyond the
//! retention flag column is ignored.

use salgspuls_domain::constants::{
    COL_CUSTOMER, COL_DATE, COL_DB, COL_MEETING, COL_ORDER_ID, COL_RETENTION, COL_SELLER,
    FLAG_CELL_TRUE,
};
use salgspuls_domain::{format_kroner, parse_cell_date, parse_kroner, SaleRecord, SyncedOrder};
use serde_json::Value;

/// Decode one raw sales row.
///
/// Returns `None` when the date cell is missing or unparseable; such rows are
/// skipped rather than treated as errors. `sheet_row` is the 1-based row
/// number in the tab, used later as the row's storage address.
pub fn parse_sale_row(sheet_row: usize, cells: &[Value]) -> Option<SaleRecord> {
    let date = parse_cell_date(cells.get(COL_DATE)?)?;

    Some(SaleRecord {
        row: sheet_row,
        date,
        raw_seller_name: string_cell(cells, COL_SELLER).unwrap_or_default(),
        amount: amount_cell(cells, COL_DB),
        is_meeting: flag_cell(cells, COL_MEETING),
        is_retention: flag_cell(cells, COL_RETENTION),
        customer_name: string_cell(cells, COL_CUSTOMER).filter(|s| !s.is_empty()),
        linked_order_id: id_cell(cells, COL_ORDER_ID),
    })
}

/// Encode one resolved order as a sales row ready to append.
///
/// Columns between the customer and the net-profit amount stay blank; the
/// meeting and retention flag cells stay blank as well since a synced order
/// is neither.
pub fn synced_order_to_row(order: &SyncedOrder) -> Vec<Value> {
    let mut row = vec![Value::String(String::new()); COL_RETENTION + 1];
    row[COL_DATE] = Value::String(order.date.clone());
    row[COL_SELLER] = Value::String(order.salesrep.clone());
    row[COL_ORDER_ID] = Value::String(order.order_id.clone());
    row[COL_CUSTOMER] = Value::String(order.customer.clone());
    row[COL_DB] = Value::String(format_kroner(order.db));
    row
}

fn string_cell(cells: &[Value], index: usize) -> Option<String> {
    match cells.get(index)? {
        Value::String(s) => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Amount cells are numeric when entered by hand but come back as formatted
/// currency strings from rows the sync wrote.
fn amount_cell(cells: &[Value], index: usize) -> f64 {
    match cells.get(index) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_kroner(s),
        _ => 0.0,
    }
}

fn flag_cell(cells: &[Value], index: usize) -> bool {
    matches!(cells.get(index), Some(Value::String(s)) if s.trim() == FLAG_CELL_TRUE)
}

/// Order ids are usually strings but purely numeric ids can come back as
/// numbers; both are kept as text.
pub(crate) fn id_cell(cells: &[Value], index: usize) -> Option<String> {
    match cells.get(index)? {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
