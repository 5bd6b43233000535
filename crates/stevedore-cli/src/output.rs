//! Formatted output helpers for CLI commands.
//!
//! Provides human-readable byte counts, relative ages and truncation for
//! tabular listings.

use chrono::{DateTime, Utc};

/// Formats a byte count into a human-readable string (e.g., "128.0 MiB").
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;

    if bytes >= GIB {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Formats an optional daemon-reported size; negative or missing is `-`.
#[must_use]
pub fn format_size(bytes: Option<i64>) -> String {
    bytes
        .and_then(|b| u64::try_from(b).ok())
        .map_or_else(|| "-".to_string(), format_bytes)
}

/// Formats how long ago `then` was, relative to `now` (e.g., "3 hours ago").
#[must_use]
pub fn format_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let secs = elapsed.num_seconds();
    if secs < 0 {
        return "just now".to_string();
    }

    let (amount, unit) = if secs < 60 {
        (secs, "second")
    } else if secs < 3600 {
        (elapsed.num_minutes(), "minute")
    } else if secs < 86_400 {
        (elapsed.num_hours(), "hour")
    } else if secs < 86_400 * 30 {
        (elapsed.num_days(), "day")
    } else if secs < 86_400 * 365 {
        (elapsed.num_days() / 30, "month")
    } else {
        (elapsed.num_days() / 365, "year")
    };

    let plural = if amount == 1 { "" } else { "s" };
    format!("{amount} {unit}{plural} ago")
}

/// Formats an optional creation time relative to the current time.
#[must_use]
pub fn format_created(created: Option<DateTime<Utc>>) -> String {
    created.map_or_else(|| "-".to_string(), |t| format_age(t, Utc::now()))
}

/// Shortens `text` to at most `max` characters, marking the cut with `…`.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
