//! Field coercers
//!
//! Convert one raw column into a nullable typed value. None of these fail:
//! anything that does not convert cleanly comes back as `None`.

use chrono::NaiveDateTime;

use super::CallDuration;

/// Canonical SMDR timestamp pattern, e.g. `2024/01/02 03:04:05`
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Empty column → `None`, anything else verbatim
pub fn coerce_text(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    Some(raw.to_string())
}

/// Base-10 signed 64-bit integer
pub fn coerce_integer(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}

/// Boolean literal
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn coerce_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Timestamp in `TIMESTAMP_FORMAT`
pub fn coerce_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()
}

/// Elapsed time in `HH:MM:SS`
///
/// Hours are not limited to 24. Wrong segment count, a non-numeric segment or
/// an overflowing total all yield `None`.
pub fn coerce_duration(raw: &str) -> Option<CallDuration> {
    let mut segments = raw.split(':');
    let (hours, minutes, seconds) = match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(h), Some(m), Some(s), None) => (h, m, s),
        _ => return None,
    };

    CallDuration::from_hms(
        hours.parse().ok()?,
        minutes.parse().ok()?,
        seconds.parse().ok()?,
    )
}
