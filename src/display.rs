//! Small formatting helpers shared by templates.

use chrono::{DateTime, Utc};

/// Truncate `text` to `max_chars` characters, appending "..." when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

pub fn is_truncated(text: &str, max_chars: usize) -> bool {
    text.chars().nth(max_chars).is_some()
}

fn parse(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts).ok().map(|t| t.with_timezone(&Utc))
}

/// `2024-05-01T10:00:00Z` → `2024-05-01`. Unparseable input is returned as-is.
pub fn date_only(ts: &str) -> String {
    parse(ts)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// `2024-05-01T10:00:00Z` → `May 1, 2024`.
pub fn long_date(ts: &str) -> String {
    parse(ts)
        .map(|t| t.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// Relative age such as "3 days ago", measured against `now`.
pub fn time_ago_from(ts: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse(ts) else {
        return ts.to_string();
    };
    let secs = (now - then).num_seconds().max(0);
    let (n, unit) = match secs {
        0..=59 => return "just now".to_string(),
        60..=3_599 => (secs / 60, "minute"),
        3_600..=86_399 => (secs / 3_600, "hour"),
        86_400..=2_591_999 => (secs / 86_400, "day"),
        2_592_000..=31_535_999 => (secs / 2_592_000, "month"),
        _ => (secs / 31_536_000, "year"),
    };
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

pub fn time_ago(ts: &str) -> String {
    time_ago_from(ts, Utc::now())
}
