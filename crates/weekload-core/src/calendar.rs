//! Calendar weeks of a year
//!
//! Weeks start on Monday. The set of weeks for a year is derived from the
//! month-by-month calendar grid, so the first week may begin in December of
//! the previous year and the last week may end in January of the next one.
//! Boundary weeks are kept whole, never clipped.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A Monday-to-Sunday calendar week
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Week {
    pub monday: NaiveDate,
    pub sunday: NaiveDate,
}

impl Week {
    /// The week containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        let monday = monday_of(date);
        Self {
            monday,
            sunday: monday + Duration::days(6),
        }
    }

    /// True when the Monday and the Sunday fall in different months
    pub fn spans_months(&self) -> bool {
        self.monday.month() != self.sunday.month()
    }
}

/// Monday of the week containing `date`
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// True when every date the week grid of `year` touches is representable
pub fn is_supported_year(year: i32) -> bool {
    let before = year
        .checked_sub(1)
        .and_then(|y| NaiveDate::from_ymd_opt(y, 12, 25));
    let after = year
        .checked_add(1)
        .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 14));
    before.is_some() && after.is_some()
}

/// Rows of the Monday-first calendar grid for one month
fn month_grid(year: i32, month: u32) -> Vec<Week> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let Some(last) = next_first.and_then(|d| d.pred_opt()) else {
        return Vec::new();
    };

    let mut rows = Vec::with_capacity(6);
    let mut week = Week::containing(first);
    while week.monday <= last {
        rows.push(week);
        week = Week {
            monday: week.monday + Duration::days(7),
            sunday: week.sunday + Duration::days(7),
        };
    }
    rows
}

/// All calendar weeks overlapping `year`, ascending by Monday.
///
/// The grid spans from the Monday on or before January 1st to the week
/// holding December 31st: 53 weeks, or 54 in a leap year starting on Sunday.
/// Empty for years outside [`is_supported_year`].
pub fn weeks_for_year(year: i32) -> Vec<Week> {
    if !is_supported_year(year) {
        return Vec::new();
    }
    let unique: BTreeSet<Week> = (1..=12).flat_map(|month| month_grid(year, month)).collect();
    unique.into_iter().collect()
}

/// Week list of a year with positional lookup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarWeeks {
    year: i32,
    weeks: Vec<Week>,
}

impl CalendarWeeks {
    pub fn for_year(year: i32) -> Self {
        Self {
            year,
            weeks: weeks_for_year(year),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Week> {
        self.weeks.iter()
    }

    /// Position of the week starting on `monday`
    pub fn index_of(&self, monday: NaiveDate) -> Option<usize> {
        self.weeks.binary_search_by_key(&monday, |w| w.monday).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn week_count_follows_grid() {
        for year in 1990..=2060 {
            let n = weeks_for_year(year).len();
            let jan1 = date(year, 1, 1);
            let leap = NaiveDate::from_ymd_opt(year, 2, 29).is_some();
            if leap && jan1.weekday() == chrono::Weekday::Sun {
                assert_eq!(n, 54, "{year}");
            } else {
                assert_eq!(n, 53, "{year}");
            }
        }
    }

    #[test]
    fn grid_covers_whole_year() {
        for year in [2012, 2023, 2024, 2025, 2026] {
            let weeks = weeks_for_year(year);
            assert!(weeks[0].monday <= date(year, 1, 1));
            assert!(weeks[0].sunday >= date(year, 1, 1));
            assert!(weeks.last().unwrap().sunday >= date(year, 12, 31));
        }
    }

    #[test]
    fn weeks_are_contiguous_mondays() {
        let weeks = weeks_for_year(2025);
        for w in &weeks {
            assert_eq!(w.monday.weekday(), chrono::Weekday::Mon);
            assert_eq!(w.sunday - w.monday, Duration::days(6));
        }
        for pair in weeks.windows(2) {
            assert_eq!(pair[1].monday - pair[0].monday, Duration::days(7));
        }
    }

    #[test]
    fn boundary_weeks_are_kept() {
        // 2025-01-01 is a Wednesday, 2025-12-31 is a Wednesday
        let weeks = weeks_for_year(2025);
        assert_eq!(weeks[0].monday, date(2024, 12, 30));
        assert_eq!(weeks.last().unwrap().sunday, date(2026, 1, 4));
        assert_eq!(weeks.len(), 53);
    }

    #[test]
    fn year_starting_on_monday() {
        // 2024-01-01 is a Monday
        let weeks = weeks_for_year(2024);
        assert_eq!(weeks[0].monday, date(2024, 1, 1));
        assert!(weeks.last().unwrap().sunday >= date(2024, 12, 31));
    }

    #[test]
    fn index_of_finds_mondays_only() {
        let cal = CalendarWeeks::for_year(2025);
        assert_eq!(cal.index_of(date(2024, 12, 30)), Some(0));
        assert_eq!(cal.index_of(date(2025, 1, 6)), Some(1));
        assert_eq!(cal.index_of(date(2025, 1, 7)), None);
        assert_eq!(cal.index_of(date(2024, 12, 23)), None);
    }

    #[test]
    fn unrepresentable_years_have_no_weeks() {
        assert!(is_supported_year(2025));
        assert!(is_supported_year(0));
        assert!(!is_supported_year(300_000));
        assert!(!is_supported_year(i32::MAX));
        assert!(!is_supported_year(i32::MIN));
        assert!(weeks_for_year(300_000).is_empty());
        assert!(weeks_for_year(i32::MAX).is_empty());

        let last = NaiveDate::MAX.year();
        assert!(!is_supported_year(last));
        assert!(is_supported_year(last - 1));
        assert!(weeks_for_year(last - 1).len() >= 53);
    }

    #[test]
    fn monday_of_is_idempotent() {
        let d = date(2025, 3, 16); // Sunday
        assert_eq!(monday_of(d), date(2025, 3, 10));
        assert_eq!(monday_of(monday_of(d)), date(2025, 3, 10));
    }
}
