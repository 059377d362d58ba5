//! Month bands of the timeline header

use chrono::Datelike;
use weekload_core::{CalendarWeeks, Week};

/// Month names in calendar order
pub const MONTH_NAMES: [&str; 12] = [
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

/// Consecutive week columns under one month name
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthSpan {
    pub name: &'static str,
    /// Index of the first week of the span in the year's week list
    pub first_week: usize,
    pub len: usize,
}

/// Zero-based month a week is shown under.
///
/// A week belongs to the month of its Monday. A week straddling two months is
/// pulled into January when it starts in the previous year, and into December
/// when it ends in the next year.
pub fn month_index(week: &Week, year: i32) -> usize {
    if week.spans_months() {
        if week.monday.year() == year - 1 {
            return 0;
        }
        if week.sunday.year() == year + 1 {
            return 11;
        }
    }
    week.monday.month0() as usize
}

/// Month spans over the weeks of a year, January to December
pub fn month_spans(weeks: &CalendarWeeks) -> Vec<MonthSpan> {
    let mut counts = [0usize; 12];
    for week in weeks.iter() {
        counts[month_index(week, weeks.year())] += 1;
    }

    let mut first_week = 0;
    MONTH_NAMES
        .into_iter()
        .zip(counts)
        .map(|(name, len)| {
            let span = MonthSpan {
                name,
                first_week,
                len,
            };
            first_week += len;
            span
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn spans_cover_every_week() {
        for year in [2012, 2024, 2025, 2026] {
            let weeks = CalendarWeeks::for_year(year);
            let spans = month_spans(&weeks);
            assert_eq!(spans.len(), 12);
            assert_eq!(spans.iter().map(|s| s.len).sum::<usize>(), weeks.len());
            assert!(spans.iter().all(|s| s.len >= 4));
        }
    }

    #[test]
    fn boundary_weeks_go_to_edge_months() {
        let first = Week::containing(date(2025, 1, 1));
        assert_eq!(first.monday, date(2024, 12, 30));
        assert_eq!(month_index(&first, 2025), 0);

        let last = Week::containing(date(2025, 12, 31));
        assert_eq!(last.sunday, date(2026, 1, 4));
        assert_eq!(month_index(&last, 2025), 11);
    }

    #[test]
    fn straddling_week_inside_year_follows_monday() {
        // Mon 2025-03-31 .. Sun 2025-04-06
        let week = Week::containing(date(2025, 4, 2));
        assert_eq!(month_index(&week, 2025), 2);
    }

    #[test]
    fn spans_are_contiguous() {
        let spans = month_spans(&CalendarWeeks::for_year(2025));
        let mut expected = 0;
        for span in spans {
            assert_eq!(span.first_week, expected);
            expected += span.len;
        }
    }
}
