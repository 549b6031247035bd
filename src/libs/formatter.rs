//! Display formatting and lenient input parsing for task times.
//!
//! Due dates are stored as RFC 3339 UTC instants but shown and typed in the
//! user's local time zone.
//!
//! ## Formats
//!
//! - Durations: `HH:MM`, negative durations shown as `00:00`
//! - Due dates: `YYYY-MM-DD HH:MM` in local time, `-` when absent
//!
//! ## Examples
//!
//! ```rust
//! use taskbell::libs::formatter::format_duration;
//! use chrono::Duration;
//!
//! assert_eq!(format_duration(&Duration::minutes(90)), "01:30");
//! assert_eq!(format_duration(&Duration::hours(-1)), "00:00");
//! ```

use super::task::parse_instant;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Formats a duration as `HH:MM`.
pub fn format_duration(duration: &Duration) -> String {
    let hours = duration.num_hours();
    let mins = duration.num_minutes() % 60;

    format!("{:02}:{:02}", hours.max(0), mins.max(0))
}

/// Formats an instant in local time.
pub fn format_local(instant: &DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format(DISPLAY_FORMAT).to_string()
}

/// Formats a stored due date for display. Unparseable values are shown verbatim.
pub fn format_due(raw: Option<&str>) -> String {
    match raw {
        None => "-".to_string(),
        Some(raw) if raw.trim().is_empty() => "-".to_string(),
        Some(raw) => parse_instant(raw).map(|due| format_local(&due)).unwrap_or_else(|| raw.to_string()),
    }
}

/// Parses a due date typed by the user.
///
/// Accepts RFC 3339 (`2025-01-15T09:30:00Z`), local `YYYY-MM-DD HH:MM`, or
/// a bare local date, which means 09:00 on that day.
pub fn parse_due_input(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Some(instant) = parse_instant(input) {
        return Some(instant);
    }
    let naive = NaiveDateTime::parse_from_str(input, DISPLAY_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(9, 0, 0))
        })?;
    Local.from_local_datetime(&naive).earliest().map(|local| local.with_timezone(&Utc))
}
