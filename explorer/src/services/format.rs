//! Display formatting shared by charts and lists.

/// Thousands-separated integer, e.g. `1,234,567`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole-dollar amount, e.g. `$1,500,000`.
pub fn usd(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(rounded.abs() as u64))
}

/// Dollar amount, or an em dash when missing or zero.
pub fn usd_or_dash(amount: Option<f64>) -> String {
    match amount {
        Some(v) if v.is_finite() && v != 0.0 => usd(v),
        _ => "—".to_string(),
    }
}

/// Rating with one decimal, or an em dash when missing.
pub fn rating_or_dash(rating: Option<f64>) -> String {
    match rating {
        Some(v) if v.is_finite() => format!("{:.1}", v),
        _ => "—".to_string(),
    }
}

/// `"Title (1999)"`, or just the title when the year is unknown.
pub fn title_with_year(title: &str, year: Option<i32>) -> String {
    match year {
        Some(year) => format!("{} ({})", title, year),
        None => title.to_string(),
    }
}
