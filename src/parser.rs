//! Lenient parsers for the raw time and coordinate cells of the ride sheet.
//!
//! Both parsers return `None` on malformed input instead of an error; callers
//! decide whether a miss drops the row or only one of its fields.

use chrono::NaiveTime;

/// Parses a time-of-day cell into a [`NaiveTime`].
///
/// Anything from the first `(` onwards is discarded (timezone annotations
/// such as `"14:05:00 (UTC+2)"`), a single-digit hour is zero-padded, and the
/// rest must match `HH:MM:SS` exactly. Minutes and seconds are never padded.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.split('(').next().unwrap_or_default().trim();

    let normalized = if trimmed
        .split(':')
        .next()
        .is_some_and(|hour| hour.chars().count() == 1)
    {
        format!("0{trimmed}")
    } else {
        trimmed.to_string()
    };

    let segments: Vec<&str> = normalized.split(':').collect();
    let [hour, minute, second] = segments.as_slice() else {
        return None;
    };

    NaiveTime::from_hms_opt(two_digits(hour)?, two_digits(minute)?, two_digits(second)?)
}

fn two_digits(segment: &str) -> Option<u32> {
    if segment.len() != 2 || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Parses a `"<lat>, <lon>"` cell into a `(latitude, longitude)` pair.
///
/// All whitespace is removed before splitting on `,`. Values are not
/// range-checked, so `"123.0, 500.0"` is returned as is.
pub fn parse_coordinates(raw: Option<&str>) -> Option<(f64, f64)> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }

    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let mut parts = compact.split(',');

    let lat = parts.next()?.parse::<f64>().ok()?;
    let lon = parts.next()?.parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }

    Some((lat, lon))
}
