//! Danish currency formatting and parsing
//!
//! The spreadsheet stores amounts either as raw numbers or as Danish-locale
//! strings (`kr 1.234,50`): comma as decimal separator, period or space as
//! thousands separator. Parsing must invert formatting exactly because
//! round-tripping through the sheet is routine.

/// Format an amount as a Danish currency string, e.g. `kr 1.234,50`.
///
/// Rounds to two decimals and groups the integer part with periods.
pub fn format_kroner(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as i64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("kr {sign}{grouped},{frac:02}")
}

/// Parse a Danish currency string back into a float.
///
/// Strips a leading `kr` marker, removes period/space thousands separators,
/// converts the decimal comma to a period and parses. Returns 0.0 on any
/// failure; a malformed cell must never fail a whole aggregation.
pub fn parse_kroner(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let without_marker = match trimmed.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("kr") => &trimmed[2..],
        _ => trimmed,
    };
    let cleaned: String = without_marker
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned.parse::<f64>().unwrap_or(0.0)
}
