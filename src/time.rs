use chrono::{NaiveDateTime, NaiveTime};

/// Parse a time string in HH:MM format
///
/// # Errors
///
/// Returns an error if the string cannot be parsed as a valid time in HH:MM format.
pub fn parse_time_hm(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(s, "%H:%M")
}

/// Whole minutes elapsed from `from` to `to`, truncated toward zero
#[must_use]
pub fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    to.signed_duration_since(from).num_minutes()
}

/// Convert a whole-minute count to fractional hours
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn minutes_to_hours(minutes: i64) -> f64 {
    minutes as f64 / 60.0
}
