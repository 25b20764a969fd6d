//! Calendar-day keys and month arithmetic.
//!
//! Bucket membership is decided on the calendar day alone. Two values written on
//! the same year/month/day are in the same bucket whatever their time of day.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone};
use std::collections::BTreeMap;

use crate::models::CalendarTask;

pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Anything a calendar day can be read from.
pub trait DateKey {
    fn date_key(&self) -> NaiveDate;
}

impl DateKey for NaiveDate {
    fn date_key(&self) -> NaiveDate {
        *self
    }
}

impl DateKey for NaiveDateTime {
    fn date_key(&self) -> NaiveDate {
        self.date()
    }
}

/// Uses the day as seen in the value's own offset; no conversion to UTC.
impl<Tz: TimeZone> DateKey for DateTime<Tz> {
    fn date_key(&self) -> NaiveDate {
        self.date_naive()
    }
}

impl DateKey for CalendarTask {
    fn date_key(&self) -> NaiveDate {
        self.date
    }
}

pub fn same_day<A: DateKey + ?Sized, B: DateKey + ?Sized>(a: &A, b: &B) -> bool {
    a.date_key() == b.date_key()
}

/// Read the calendar day out of a date or date-time string.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 (`2024-03-15T23:59:00+02:00`) and naive
/// `YYYY-MM-DDTHH:MM[:SS[.f]]` forms.
pub fn parse_date_key(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }
    const NAIVE_FORMATS: [&str; 5] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.date())
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn valid_month(year: i32, month: u32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year) && (1..=12).contains(&month)
}

/// Number of days in `month` (1-12) of `year`, Gregorian rules.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !valid_month(year, month) {
        return None;
    }
    let days = match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    };
    Some(days)
}

/// Weekday of the 1st of the month, 0 = Sunday through 6 = Saturday.
///
/// This is the number of blank cells before day 1 in a Sunday-first grid.
pub fn first_weekday_offset(year: i32, month: u32) -> Option<u32> {
    if !valid_month(year, month) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1).map(|first| first.weekday().num_days_from_sunday())
}

/// Move `delta` months from `(year, month)`; `None` when leaving years 1-9999.
pub fn shift_month(year: i32, month: u32, delta: i32) -> Option<(i32, u32)> {
    if !valid_month(year, month) {
        return None;
    }
    let month_index = i32::try_from(month).ok()? - 1;
    let total = year.checked_mul(12)?.checked_add(month_index)?.checked_add(delta)?;
    let new_year = total.div_euclid(12);
    let new_month = u32::try_from(total.rem_euclid(12) + 1).ok()?;
    valid_month(new_year, new_month).then_some((new_year, new_month))
}

pub fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(index).copied()
}

/// Tasks on the same calendar day as `day`, in collection order.
pub fn tasks_for_date<'a, D: DateKey + ?Sized>(
    tasks: &'a [CalendarTask],
    day: &D,
) -> Vec<&'a CalendarTask> {
    tasks.iter().filter(|task| same_day(*task, day)).collect()
}

/// Group tasks by calendar day, keeping collection order inside each day.
pub fn bucket_by_date(tasks: &[CalendarTask]) -> BTreeMap<NaiveDate, Vec<&CalendarTask>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&CalendarTask>> = BTreeMap::new();
    for task in tasks {
        buckets.entry(task.date).or_default().push(task);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn same_day_ignores_time_of_day() {
        let late = parse_date_key("2024-03-15T23:59:00").unwrap();
        let early = parse_date_key("2024-03-15T00:00:01").unwrap();
        assert_eq!(late, early);
        assert_eq!(late, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[test]
    fn same_day_compares_across_date_types() {
        let evening: NaiveDateTime = "2024-03-15T21:30:00".parse().unwrap();
        let morning_abroad = FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 15, 6, 0, 0)
            .unwrap();
        let task = CalendarTask {
            id: "1".into(),
            title: "dentist".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            time: None,
            priority: crate::models::Priority::Low,
        };

        assert!(same_day(&evening, &morning_abroad));
        assert!(same_day(&task, &evening));
        assert!(same_day(&morning_abroad, &task));
        assert!(!same_day(&task, &NaiveDate::from_ymd_opt(2024, 3, 16).unwrap()));
    }

    #[test]
    fn offset_date_times_keep_their_own_day() {
        let dt = FixedOffset::east_opt(10 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 16, 1, 0, 0)
            .unwrap();
        // In UTC this instant is still March 15; the key follows the written day.
        assert_eq!(dt.date_key(), NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
        assert_eq!(
            parse_date_key("2024-03-16T01:00:00+10:00"),
            NaiveDate::from_ymd_opt(2024, 3, 16)
        );
        assert_eq!(
            parse_date_key("2024-03-15T10:00:00.000Z"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
    }

    #[test]
    fn rejects_non_dates() {
        assert_eq!(parse_date_key("tomorrow"), None);
        assert_eq!(parse_date_key("2024-02-30"), None);
    }

    #[test]
    fn month_lengths_follow_gregorian_rules() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(1900, 2), Some(28));
        assert_eq!(days_in_month(2000, 2), Some(29));
        assert_eq!(days_in_month(2024, 4), Some(30));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(9999, 12), Some(31));
        assert_eq!(days_in_month(2024, 13), None);
        assert_eq!(days_in_month(0, 1), None);
        assert_eq!(days_in_month(10000, 1), None);
    }

    #[test]
    fn month_lengths_agree_with_chrono_everywhere() {
        for year in MIN_YEAR..=MAX_YEAR {
            for month in 1..=12 {
                let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
                let last = first
                    .checked_add_months(chrono::Months::new(1))
                    .unwrap()
                    .pred_opt()
                    .unwrap();
                assert_eq!(days_in_month(year, month), Some(last.day()), "{year}-{month}");
            }
        }
    }

    #[test]
    fn first_weekday_offsets() {
        // March 1, 2024 was a Friday.
        assert_eq!(first_weekday_offset(2024, 3), Some(5));
        // September 2024 starts on a Sunday.
        assert_eq!(first_weekday_offset(2024, 9), Some(0));
        // January 1, 0001 is a Monday in the proleptic Gregorian calendar.
        assert_eq!(first_weekday_offset(1, 1), Some(1));
        assert_eq!(
            first_weekday_offset(9999, 12),
            Some(NaiveDate::from_ymd_opt(9999, 12, 1).unwrap().weekday().num_days_from_sunday())
        );
        assert_eq!(first_weekday_offset(2024, 0), None);
    }

    #[test]
    fn shifting_months_wraps_years() {
        assert_eq!(shift_month(2024, 1, -1), Some((2023, 12)));
        assert_eq!(shift_month(2024, 12, 1), Some((2025, 1)));
        assert_eq!(shift_month(2024, 3, 0), Some((2024, 3)));
        assert_eq!(shift_month(2024, 3, 25), Some((2026, 4)));
        assert_eq!(shift_month(1, 1, -1), None);
        assert_eq!(shift_month(9999, 12, 1), None);
    }

    #[test]
    fn month_names() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }
}
