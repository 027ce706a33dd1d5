use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

pub const OFFSET_SECONDS: i32 = 8 * 3600;
/// Stored as text at a fixed +08:00 offset so string order is time order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";
pub const MIN_TIMESTAMP: &str = "0000-01-01 00:00:00 +08:00";
pub const MAX_TIMESTAMP: &str = "9999-12-31 23:59:59 +08:00";

const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S %:z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S %z",
];
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Which end of a range a date-only bound stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

pub fn offset() -> FixedOffset {
    FixedOffset::east_opt(OFFSET_SECONDS).unwrap_or(Utc.fix())
}

pub fn now() -> String {
    format(Utc::now())
}

pub fn format<Tz: TimeZone>(at: DateTime<Tz>) -> String {
    at.with_timezone(&offset()).format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a range bound and renders it in the stored format.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` with or without an offset, and a
/// bare date. Values without an offset are read at +08:00.
pub fn parse_bound(input: &str, bound: Bound) -> Result<String, String> {
    let input = input.trim();
    parse_datetime(input, bound)
        .map(format)
        .ok_or_else(|| format!("invalid date: {input:?}"))
}

fn parse_datetime(input: &str, bound: Bound) -> Option<DateTime<FixedOffset>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(input) {
        return Some(at);
    }
    if let Some(at) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(input, format).ok())
    {
        return Some(at);
    }
    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?;
            match bound {
                Bound::Start => date.and_hms_opt(0, 0, 0),
                Bound::End => date.and_hms_opt(23, 59, 59),
            }
        })?;
    offset().from_local_datetime(&naive).single()
}
