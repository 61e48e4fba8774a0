use chrono::{DateTime, Utc};

/// Abbreviated dollar amount: `$1.5M`, `$3K`, `$500`.
pub fn format_currency(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        return format!("${:.1}M", round_to(amount / 1_000_000.0, 1));
    }
    if amount >= 1_000.0 {
        return format!("${:.0}K", round_to(amount / 1_000.0, 0));
    }
    format!("${:.0}", round_to(amount, 0))
}

/// Trade-table variant with no plain-dollar tier: `$1.5M`, `$250K`, `$1K`.
pub fn format_trade_value(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        return format!("${:.1}M", round_to(amount / 1_000_000.0, 1));
    }
    format!("${:.0}K", round_to(amount / 1_000.0, 0))
}

// `{:.N}` rounds ties to even; display amounts round ties away from zero.
fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

pub fn format_time_ago(date: DateTime<Utc>) -> String {
    format_time_ago_at(date, Utc::now())
}

pub fn format_time_ago_at(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - date).num_hours();
    if hours < 1 {
        return "Just now".to_string();
    }
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}

/// Day-granularity variant used on deal cards.
pub fn format_days_ago(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now - date).num_days();
    match days {
        i64::MIN..=0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        7..=29 => format!("{} weeks ago", days / 7),
        _ => format!("{} months ago", days / 30),
    }
}

pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}
