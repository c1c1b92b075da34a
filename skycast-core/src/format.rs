//! Date/time rendering in the German convention the dashboard uses
//! (`dd.MM.yyyy, HH:mm`).

use chrono::{NaiveDate, NaiveDateTime};

const PROVIDER_LOCALTIME: &str = "%Y-%m-%d %H:%M";
const DATE_TIME: &str = "%d.%m.%Y, %H:%M";
const DATE: &str = "%d.%m.%Y";

/// Reformat a provider local-time string such as `2024-05-01 14:30`.
///
/// Values that do not parse are returned unchanged.
pub fn format_local_time(raw: &str) -> String {
    match NaiveDateTime::parse_from_str(raw.trim(), PROVIDER_LOCALTIME) {
        Ok(dt) => format_date_time(dt),
        Err(err) => {
            tracing::debug!("Unparseable local time '{raw}': {err}");
            raw.to_string()
        }
    }
}

pub fn format_date_time(dt: NaiveDateTime) -> String {
    dt.format(DATE_TIME).to_string()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE).to_string()
}
