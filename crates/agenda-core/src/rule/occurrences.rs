//! Anchor-phased occurrence enumeration.
//!
//! Enumeration starts at the anchor (never before it) and keeps the
//! anchor's time-of-day and UTC offset on every occurrence. Dates that do
//! not exist (Feb 30, Feb 29 off leap years) are skipped, except plain
//! monthly stepping, which clamps the anchor's day to the month length so
//! a "every month" rule anchored on the 31st still fires in February.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone};

use crate::rule::{Frequency, Rule, Weekday};

impl Rule {
    /// Infinite iterator over occurrences at and after `anchor`, strictly
    /// ascending with no duplicates.
    #[must_use]
    pub fn occurrences_from(&self, anchor: DateTime<FixedOffset>) -> Occurrences<'_> {
        let state = match self.frequency {
            Frequency::Daily => State::Uniform {
                step_days: i64::from(self.interval),
                k: 0,
            },
            Frequency::Weekly if !self.by_day.is_empty() => State::WeekdaySet {
                offsets: self.by_day.iter().map(|d| d.days_from_monday()).collect(),
                block: 0,
                idx: 0,
            },
            Frequency::Weekly => State::Uniform {
                step_days: i64::from(self.interval) * 7,
                k: 0,
            },
            Frequency::Monthly => State::Monthly { k: 0 },
            Frequency::Yearly => State::Yearly { k: 0 },
        };
        Occurrences {
            rule: self,
            anchor,
            state,
        }
    }

    /// Occurrences within `[start, end]`, both bounds inclusive.
    #[must_use]
    pub fn occurrences_between(
        &self,
        anchor: DateTime<FixedOffset>,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Vec<DateTime<FixedOffset>> {
        if end < start {
            return Vec::new();
        }
        self.occurrences_from(anchor)
            .skip_while(|d| *d < start)
            .take_while(|d| *d <= end)
            .collect()
    }

    /// First occurrence strictly after `after`.
    ///
    /// Returns `None` only if enumeration runs off the calendar.
    #[must_use]
    pub fn next_occurrence_after(
        &self,
        anchor: DateTime<FixedOffset>,
        after: DateTime<FixedOffset>,
    ) -> Option<DateTime<FixedOffset>> {
        self.occurrences_from(anchor).find(|d| *d > after)
    }
}

#[derive(Debug)]
enum State {
    /// Daily, or weekly without a weekday set: fixed stride in days.
    Uniform { step_days: i64, k: i64 },
    /// Weekly with a weekday set: week blocks from the anchor's Monday,
    /// `offsets` sorted Monday-first.
    WeekdaySet {
        offsets: Vec<u32>,
        block: i64,
        idx: usize,
    },
    Monthly { k: i64 },
    Yearly { k: i64 },
}

/// Iterator behind [`Rule::occurrences_from`].
#[derive(Debug)]
pub struct Occurrences<'a> {
    rule: &'a Rule,
    anchor: DateTime<FixedOffset>,
    state: State,
}

impl Iterator for Occurrences<'_> {
    type Item = DateTime<FixedOffset>;

    fn next(&mut self) -> Option<Self::Item> {
        let anchor_date = self.anchor.date_naive();
        loop {
            let candidate = match &mut self.state {
                State::Uniform { step_days, k } => {
                    let days = k.checked_mul(*step_days)?;
                    *k += 1;
                    anchor_date.checked_add_signed(Duration::days(days))
                }
                State::WeekdaySet {
                    offsets,
                    block,
                    idx,
                } => {
                    let anchor_monday = anchor_date.checked_sub_signed(Duration::days(
                        i64::from(anchor_date.weekday().num_days_from_monday()),
                    ))?;
                    let week_days = block
                        .checked_mul(i64::from(self.rule.interval))?
                        .checked_mul(7)?;
                    let offset = i64::from(offsets[*idx]);
                    *idx += 1;
                    if *idx == offsets.len() {
                        *idx = 0;
                        *block += 1;
                    }
                    anchor_monday.checked_add_signed(Duration::days(week_days + offset))
                }
                State::Monthly { k } => {
                    let months = k.checked_mul(i64::from(self.rule.interval))?;
                    *k += 1;
                    month_occurrence(anchor_date, months, self.rule.by_month_day)
                }
                State::Yearly { k } => {
                    let years = k.checked_mul(i64::from(self.rule.interval))?;
                    *k += 1;
                    let year = i64::from(anchor_date.year()).checked_add(years)?;
                    let year = i32::try_from(year).ok()?;
                    // Skips years where the anchor's month-day does not
                    // exist (Feb 29 outside leap years).
                    NaiveDate::from_ymd_opt(year, anchor_date.month(), anchor_date.day())
                }
            };

            let Some(date) = candidate else {
                continue;
            };
            let Some(dt) = self
                .anchor
                .offset()
                .from_local_datetime(&date.and_time(self.anchor.time()))
                .single()
            else {
                continue;
            };
            if dt < self.anchor {
                continue;
            }
            return Some(dt);
        }
    }
}

/// Date of the occurrence `months` months past the anchor month.
///
/// An explicit BYMONTHDAY is taken literally and the month is skipped if it
/// lacks that day; plain stepping clamps the anchor's day instead.
fn month_occurrence(anchor: NaiveDate, months: i64, by_month_day: Option<u32>) -> Option<NaiveDate> {
    let total = i64::from(anchor.year()) * 12 + i64::from(anchor.month0()) + months;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;

    match by_month_day {
        Some(day) => NaiveDate::from_ymd_opt(year, month, day),
        None => {
            let day = anchor.day().min(days_in_month(year, month));
            NaiveDate::from_ymd_opt(year, month, day)
        }
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    for day in (28..=31).rev() {
        if NaiveDate::from_ymd_opt(year, month, day).is_some() {
            return day;
        }
    }
    28
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).expect("valid offset")
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
        utc()
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .single()
            .expect("valid datetime")
    }

    fn dates(occurrences: &[DateTime<FixedOffset>]) -> Vec<(u32, u32)> {
        occurrences.iter().map(|d| (d.month(), d.day())).collect()
    }

    #[test]
    fn daily_interval_three_hits_expected_days() {
        let rule = Rule::parse("FREQ=DAILY;INTERVAL=3").expect("valid rule");
        let got = rule.occurrences_between(at(2024, 1, 1, 9), at(2024, 1, 1, 0), at(2024, 1, 10, 23));
        assert_eq!(dates(&got), vec![(1, 1), (1, 4), (1, 7), (1, 10)]);
    }

    #[test]
    fn weekly_byday_two_week_window_yields_six() {
        // Anchor Monday 2024-01-01; two full weeks.
        let rule = Rule::parse("FREQ=WEEKLY;BYDAY=MO,WE,FR").expect("valid rule");
        let got = rule.occurrences_between(at(2024, 1, 1, 8), at(2024, 1, 1, 0), at(2024, 1, 14, 23));
        assert_eq!(got.len(), 6);
        assert_eq!(
            dates(&got),
            vec![(1, 1), (1, 3), (1, 5), (1, 8), (1, 10), (1, 12)]
        );
        for pair in got.windows(2) {
            assert!(pair[0] < pair[1], "occurrences must be strictly ascending");
        }
        for d in &got {
            assert!(matches!(
                Weekday::from_chrono(d.weekday()),
                Weekday::Mo | Weekday::We | Weekday::Fr
            ));
        }
    }

    #[test]
    fn weekly_byday_never_yields_before_anchor() {
        // Anchor Wednesday; the Monday of the anchor week is excluded.
        let rule = Rule::parse("FREQ=WEEKLY;BYDAY=MO,WE").expect("valid rule");
        let got = rule.occurrences_between(at(2024, 1, 3, 8), at(2024, 1, 1, 0), at(2024, 1, 9, 23));
        assert_eq!(dates(&got), vec![(1, 3), (1, 8)]);
    }

    #[test]
    fn weekly_byday_honors_interval_per_week_block() {
        let rule = Rule::parse("FREQ=WEEKLY;INTERVAL=2;BYDAY=MO").expect("valid rule");
        let got = rule.occurrences_between(at(2024, 1, 1, 8), at(2024, 1, 1, 0), at(2024, 1, 31, 23));
        assert_eq!(dates(&got), vec![(1, 1), (1, 15), (1, 29)]);
    }

    #[test]
    fn weekly_plain_steps_whole_weeks() {
        let rule = Rule::parse("FREQ=WEEKLY").expect("valid rule");
        let got = rule.occurrences_between(at(2024, 1, 2, 8), at(2024, 1, 1, 0), at(2024, 1, 20, 23));
        assert_eq!(dates(&got), vec![(1, 2), (1, 9), (1, 16)]);
    }

    #[test]
    fn monthly_explicit_day_skips_short_months() {
        let rule = Rule::parse("FREQ=MONTHLY;BYMONTHDAY=31").expect("valid rule");
        let got = rule.occurrences_between(at(2024, 1, 1, 9), at(2024, 1, 1, 0), at(2024, 6, 30, 23));
        // Feb, Apr, Jun have no 31st.
        assert_eq!(dates(&got), vec![(1, 31), (3, 31), (5, 31)]);
    }

    #[test]
    fn monthly_plain_clamps_anchor_day() {
        let rule = Rule::parse("FREQ=MONTHLY").expect("valid rule");
        let got = rule.occurrences_between(at(2024, 1, 31, 9), at(2024, 1, 1, 0), at(2024, 4, 30, 23));
        // 2024 is a leap year: Feb clamps to 29, later months recover the 31st/30th.
        assert_eq!(dates(&got), vec![(1, 31), (2, 29), (3, 31), (4, 30)]);
    }

    #[test]
    fn monthly_explicit_day_before_anchor_day_starts_next_month() {
        let rule = Rule::parse("FREQ=MONTHLY;BYMONTHDAY=5").expect("valid rule");
        let got = rule.occurrences_between(at(2024, 1, 20, 9), at(2024, 1, 1, 0), at(2024, 3, 31, 23));
        assert_eq!(dates(&got), vec![(2, 5), (3, 5)]);
    }

    #[test]
    fn yearly_leap_day_only_fires_in_leap_years() {
        let rule = Rule::parse("FREQ=YEARLY").expect("valid rule");
        let got = rule.occurrences_between(at(2024, 2, 29, 9), at(2024, 1, 1, 0), at(2029, 12, 31, 23));
        let years: Vec<i32> = got.iter().map(Datelike::year).collect();
        assert_eq!(years, vec![2024, 2028]);
    }

    #[test]
    fn occurrences_keep_anchor_time_and_offset() {
        let offset = FixedOffset::west_opt(5 * 3600).expect("valid offset");
        let anchor = offset
            .with_ymd_and_hms(2024, 3, 10, 15, 30, 0)
            .single()
            .expect("valid datetime");
        let rule = Rule::parse("FREQ=DAILY").expect("valid rule");
        let got = rule.occurrences_between(
            anchor,
            anchor,
            anchor + Duration::days(2) + Duration::hours(1),
        );
        assert_eq!(got.len(), 3);
        for d in &got {
            assert_eq!(d.time(), anchor.time());
            assert_eq!(*d.offset(), *anchor.offset());
        }
    }

    #[test]
    fn empty_window_before_anchor_yields_nothing() {
        let rule = Rule::parse("FREQ=DAILY").expect("valid rule");
        let got = rule.occurrences_between(at(2024, 6, 1, 9), at(2024, 1, 1, 0), at(2024, 1, 31, 23));
        assert!(got.is_empty());
    }

    #[test]
    fn inverted_window_yields_nothing() {
        let rule = Rule::parse("FREQ=DAILY").expect("valid rule");
        let got = rule.occurrences_between(at(2024, 1, 1, 9), at(2024, 1, 10, 0), at(2024, 1, 1, 0));
        assert!(got.is_empty());
    }

    #[test]
    fn next_occurrence_after_steps_past_the_probe() {
        let rule = Rule::parse("FREQ=WEEKLY;BYDAY=MO,FR").expect("valid rule");
        let next = rule
            .next_occurrence_after(at(2024, 1, 1, 9), at(2024, 1, 1, 9))
            .expect("has next");
        assert_eq!((next.month(), next.day()), (1, 5));

        let next = rule
            .next_occurrence_after(at(2024, 1, 1, 9), at(2023, 1, 1, 0))
            .expect("has next");
        // Probe before the anchor: first occurrence is the anchor itself.
        assert_eq!((next.month(), next.day()), (1, 1));
    }
}
