use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;

pub const NOT_SPECIFIED: &str = "Not specified";

static BLACKLIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(asap|tbd|n/a|na|not specified)$").unwrap());
static ISO_DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
// DD-MM-YYYY hh:mm[:ss] AM/PM, as emitted by one internship feed
static DMY_CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,2})-(\d{1,2})-(\d{4})\s+(\d{1,2}):(\d{2})(?::(\d{2}))?\s*(AM|PM)$").unwrap()
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%A, %B %d, %Y",
];

/// Parse any supported date shape to a UTC instant. Date-only inputs land on midnight UTC.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let text = value.trim();
    if text.is_empty() || BLACKLIST_RE.is_match(text) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return Some(d.and_time(NaiveTime::MIN).and_utc());
        }
    }
    parse_dmy_clock(text)
}

fn parse_dmy_clock(text: &str) -> Option<DateTime<Utc>> {
    let caps = DMY_CLOCK_RE.captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    let mut hour: u32 = caps[4].parse().ok()?;
    let minute: u32 = caps[5].parse().ok()?;
    let second: u32 = caps.get(6).map_or(Some(0), |m| m.as_str().parse().ok())?;
    let pm = caps[7].eq_ignore_ascii_case("PM");

    if pm && hour != 12 {
        hour += 12;
    }
    if !pm && hour == 12 {
        hour = 0;
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    Some(date.and_time(time).and_utc())
}

/// `YYYY-MM-DD` for structured metadata; `None` means "omit the field".
pub fn to_iso_date(value: &str) -> Option<String> {
    let text = value.trim();
    if text.is_empty() || BLACKLIST_RE.is_match(text) {
        return None;
    }
    if ISO_DATE_RE.is_match(text) {
        return Some(text.to_string());
    }
    parse_datetime(text).map(|dt| dt.format("%Y-%m-%d").to_string())
}

pub fn to_iso_end_of_day(value: &str) -> Option<String> {
    to_iso_date(value).map(|d| format!("{}T23:59:59Z", d))
}

pub fn timestamp_millis(value: &str) -> Option<i64> {
    parse_datetime(value).map(|dt| dt.timestamp_millis())
}

/// Human display ("February 20, 2026"); anything unresolvable reads "Not specified".
pub fn display(value: Option<&str>) -> String {
    value
        .and_then(parse_datetime)
        .map(|dt| dt.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}
