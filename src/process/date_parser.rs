use chrono::{NaiveDate, NaiveDateTime};

use super::utils::clean_str;

// Two-digit years first: `%Y` would otherwise read `21` as year 21.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%y", "%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y", "%d.%m.%Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Parse a free-text registry date into a calendar date.
///
/// Accepts the day-first French layouts seen in the registry as well as ISO
/// dates and timestamps (time and offset are discarded). Returns `None` for
/// anything else.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = clean_str(raw);
    if s.is_empty() {
        return None;
    }
    if let Some(d) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&s, fmt).ok())
    {
        return Some(d);
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&s, fmt).ok())
    {
        return Some(dt.date());
    }
    chrono::DateTime::parse_from_rfc3339(&s)
        .ok()
        .map(|dt| dt.date_naive())
}
