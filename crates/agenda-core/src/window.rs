//! View window arithmetic.
//!
//! Windows are closed intervals at calendar-day granularity: the start sits
//! on 00:00:00.000 and the end on 23:59:59.999 of their days, in the view
//! timezone. Weeks start on Monday.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::rule::occurrences::days_in_month;

/// An inclusive date-time interval used to bound expansion and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl Window {
    #[must_use]
    pub const fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { start, end }
    }

    /// The window covering exactly the day of `date`.
    #[must_use]
    pub fn day(date: NaiveDate, tz: FixedOffset) -> Self {
        Self::over_days(date, date, tz)
    }

    /// Monday 00:00:00.000 through the following Sunday 23:59:59.999 of the
    /// week containing `date`.
    #[must_use]
    pub fn week(date: NaiveDate, tz: FixedOffset) -> Self {
        let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
        Self::over_days(monday, monday + Duration::days(6), tz)
    }

    /// First through last calendar day of the month containing `date`.
    #[must_use]
    pub fn month(date: NaiveDate, tz: FixedOffset) -> Self {
        let last_day = days_in_month(date.year(), date.month());
        Self::over_days(
            date.with_day(1).unwrap_or(date),
            date.with_day(last_day).unwrap_or(date),
            tz,
        )
    }

    /// [`Self::month`] extended backward to the preceding Monday and forward
    /// to the following Sunday, so a month grid renders complete weeks.
    #[must_use]
    pub fn month_display(date: NaiveDate, tz: FixedOffset) -> Self {
        let month = Self::month(date, tz);
        let first = month.start.date_naive();
        let last = month.end.date_naive();
        let lead = i64::from(first.weekday().num_days_from_monday());
        let trail = 6 - i64::from(last.weekday().num_days_from_monday());
        Self::over_days(first - Duration::days(lead), last + Duration::days(trail), tz)
    }

    /// Jan 1 through Dec 31 of the year containing `date`.
    #[must_use]
    pub fn year(date: NaiveDate, tz: FixedOffset) -> Self {
        Self::over_days(
            NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
            NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date),
            tz,
        )
    }

    /// Whether `dt` falls within the window, bounds inclusive.
    #[must_use]
    pub fn contains(&self, dt: DateTime<FixedOffset>) -> bool {
        self.start <= dt && dt <= self.end
    }

    /// Every calendar day the window touches, in order.
    #[must_use]
    pub fn date_range(&self) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut current = self.start.date_naive();
        let last = self.end.date_naive();
        while current <= last {
            days.push(current);
            current += Duration::days(1);
        }
        days
    }

    fn over_days(first: NaiveDate, last: NaiveDate, tz: FixedOffset) -> Self {
        Self {
            start: local(first, NaiveTime::MIN, tz),
            end: local(last, day_end(), tz),
        }
    }
}

/// Whether two date-times fall on the same calendar day of their offsets.
#[must_use]
pub fn is_same_day(a: DateTime<FixedOffset>, b: DateTime<FixedOffset>) -> bool {
    a.date_naive() == b.date_naive()
}

fn day_end() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

fn local(date: NaiveDate, time: NaiveTime, tz: FixedOffset) -> DateTime<FixedOffset> {
    // Fixed offsets have no gaps or folds, so the local time is unambiguous.
    tz.from_local_datetime(&date.and_time(time))
        .single()
        .unwrap_or_else(|| DateTime::from_naive_utc_and_offset(date.and_time(time) - tz, tz))
}
