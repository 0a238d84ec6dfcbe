/// Format a number with thousands separators and a fixed number of decimals.
///
/// # Examples
///
/// ```
/// use insight_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format an amount as dollars with cents, e.g. `"$1,234.56"` or `"-$9.99"`.
///
/// ```
/// use insight_core::formatting::format_currency;
///
/// assert_eq!(format_currency(1234.56), "$1,234.56");
/// assert_eq!(format_currency(0.0), "$0.00");
/// assert_eq!(format_currency(-9.99), "-$9.99");
/// ```
pub fn format_currency(amount: f64) -> String {
    format_dollars(amount, 2)
}

/// Whole-dollar amount as shown on metric cards, e.g. `"$1,235"`.
pub fn format_whole_currency(amount: f64) -> String {
    format_dollars(amount, 0)
}

/// Signed percentage with one decimal, e.g. `"+12.3%"`.
///
/// ```
/// use insight_core::formatting::format_percent_change;
///
/// assert_eq!(format_percent_change(12.34), "+12.3%");
/// assert_eq!(format_percent_change(-41.666), "-41.7%");
/// assert_eq!(format_percent_change(0.0), "+0.0%");
/// ```
pub fn format_percent_change(percent: f64) -> String {
    format!("{percent:+.1}%")
}

fn format_dollars(amount: f64, decimals: usize) -> String {
    let body = format_number(amount.abs(), decimals);
    if amount < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

/// Insert `,` every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
