//! Unit price parsing for raw sales rows.

/// The only currency symbol accepted in front of a price.
pub const CURRENCY_SYMBOL: char = '$';

/// Parse a unit price such as `"$3.00"` or `"3.5"`.
///
/// A single leading [`CURRENCY_SYMBOL`] is stripped; the remainder must be a
/// finite decimal number. Returns `None` for anything else, including a
/// different currency symbol, a repeated `$`, or `"N/A"`.
pub fn parse_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix(CURRENCY_SYMBOL).unwrap_or(trimmed);
    if !looks_numeric(digits) {
        return None;
    }
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Revenue for one transaction.
pub fn compute_sales(unit_price: f64, quantity: i64) -> f64 {
    unit_price * quantity as f64
}

/// Rejects spellings `f64::from_str` accepts but a price column never holds
/// (`inf`, `NaN`, `infinity`).
fn looks_numeric(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
}
