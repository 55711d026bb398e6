//! Duration helpers for CLI input and output

use std::time::Duration;

/// Parse a human-entered duration: a number with an optional unit
/// suffix (`s`, `m`, `h`, `d`). A bare number means seconds.
///
/// Returns `None` for anything it cannot understand.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (value, unit) = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => (&s[..idx], &s[idx..]),
        None => (s, "s"),
    };

    let value: u64 = value.parse().ok()?;
    let secs = match unit {
        "s" | "sec" | "secs" => value,
        "m" | "min" | "mins" => value.checked_mul(60)?,
        "h" | "hr" | "hrs" => value.checked_mul(3600)?,
        "d" | "day" | "days" => value.checked_mul(86400)?,
        _ => return None,
    };

    Some(Duration::from_secs(secs))
}

/// Format a duration in human-readable form
pub fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let days = total_secs / 86400;
    let hours = (total_secs % 86400) / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
