/// Format a number with thousands separators and a fixed number of decimals.
///
/// # Examples
///
/// ```
/// use pulse_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let rendered = format!("{:.prec$}", value.abs(), prec = decimals as usize);
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rendered.as_str(), None),
    };

    let mut out = String::new();
    // "-0" and "-0.00" render without a sign.
    if value < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format a whole count with thousands separators.
///
/// ```
/// use pulse_core::formatting::format_count;
///
/// assert_eq!(format_count(20_000), "20,000");
/// ```
pub fn format_count(count: u64) -> String {
    group_thousands(&count.to_string())
}

/// Format a monetary amount in USD with `decimals` places.
///
/// The dashboard shows headline figures such as MRR and LTV with no
/// decimals, and per-user figures such as ARPU with two.
///
/// ```
/// use pulse_core::formatting::format_currency;
///
/// assert_eq!(format_currency(48_213.7, 0), "$48,214");
/// assert_eq!(format_currency(12.5, 2), "$12.50");
/// assert_eq!(format_currency(-9.99, 2), "-$9.99");
/// ```
pub fn format_currency(amount: f64, decimals: u32) -> String {
    let body = format_number(amount.abs(), decimals);
    if amount < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-${}", body)
    } else {
        format!("${}", body)
    }
}

/// Format a fraction in `[0, 1]` as a percentage with one decimal.
///
/// ```
/// use pulse_core::formatting::format_rate;
///
/// assert_eq!(format_rate(0.125), "12.5%");
/// assert_eq!(format_rate(0.0), "0.0%");
/// ```
pub fn format_rate(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero.
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of a digit string.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
