//! Time utilities: task date parsing, week anchoring, ICS date-times.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::error::ScheduleError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Floating local time, no zone suffix.
pub const ICAL_DATETIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Parse a `YYYY-MM-DD` task date. Anything else is `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// The Monday strictly after `today`. A Monday advances a full week.
///
/// `None` when that Monday is past the last representable date.
pub fn next_week_start(today: NaiveDate) -> Option<NaiveDate> {
    let days_ahead = 7 - u64::from(today.weekday().num_days_from_monday());
    today.checked_add_days(Days::new(days_ahead))
}

/// Calendar date of `now` in the IANA zone `tz` (e.g. "Europe/Berlin").
pub fn local_today(now: DateTime<Utc>, tz: &str) -> Result<NaiveDate, ScheduleError> {
    let zone: Tz = tz
        .parse()
        .map_err(|_| ScheduleError::InvalidTimezone(tz.to_string()))?;
    Ok(now.with_timezone(&zone).date_naive())
}

pub fn to_ical_datetime(dt: NaiveDateTime) -> String {
    dt.format(ICAL_DATETIME_FORMAT).to_string()
}
