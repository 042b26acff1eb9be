//! Local-calendar helpers.
//!
//! Instants are stored in UTC; "today", "end of day", and "09:00 tomorrow" are
//! local wall-clock notions, so every conversion goes through here.

use chrono::{
    DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Utc,
};

/// Local calendar date of an instant.
#[must_use]
pub fn local_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&Local).date_naive()
}

/// Convert a local wall-clock time to an instant.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant; times that
/// do not exist (DST spring-forward) are shifted one hour later.
#[must_use]
pub fn local_instant(naive: NaiveDateTime) -> DateTime<Utc> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => Local
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map_or_else(|| Utc.from_utc_datetime(&naive), |dt| dt.with_timezone(&Utc)),
    }
}

/// 23:59:59.999 local time on `date`.
#[must_use]
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    local_instant(date.and_time(time))
}

/// Local midnight at the start of `date`.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    local_instant(date.and_time(NaiveTime::MIN))
}

/// `hour`:00 local time on `date`. Hours past 23 clamp to 23.
#[must_use]
pub fn at_hour(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    local_instant(date.and_time(time))
}

/// Last calendar day of the month containing `date`.
#[must_use]
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month0() == 11 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or(date)
}
