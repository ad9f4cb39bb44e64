//! Time utilities: timezone-aware due dates and "today".

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, TasketError};

pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| TasketError::Configuration(format!("invalid timezone: {tz}")))
}

/// Parse a due date given as RFC 3339, `YYYY-MM-DD HH:MM` or `YYYY-MM-DD`
/// (midnight) in `tz`, returning UTC.
pub fn parse_due_date(input: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    let ndt = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M")
        .or_else(|_| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
        })
        .map_err(|e| TasketError::validation("due date", format!("'{input}': {e}")))?;

    let local = tz.from_local_datetime(&ndt).single().ok_or_else(|| {
        TasketError::validation(
            "due date",
            format!("ambiguous or invalid local time (DST?): {input} {tz}"),
        )
    })?;

    Ok(local.with_timezone(&Utc))
}

/// Calendar date of `now` in `tz`.
pub fn today_in(tz: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}
