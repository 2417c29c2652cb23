use chrono::{Datelike, Duration, NaiveDate};

use crate::models::weekday_index;

pub const WEEKDAY_SHORT: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// ISO calendar-day string, the canonical date key throughout the store.
pub fn format_ymd(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_ymd(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// The Sunday that starts the week containing `anchor`.
pub fn start_of_week(anchor: NaiveDate) -> NaiveDate {
    anchor - Duration::days(weekday_index(anchor) as i64)
}

/// The seven dates of the week containing `anchor`, Sunday first.
pub fn week_dates(anchor: NaiveDate) -> Vec<NaiveDate> {
    let start = start_of_week(anchor);
    (0..7).map(|i| start + Duration::days(i)).collect()
}

/// Six Sunday-started weeks of seven days covering the month containing
/// `anchor`. Always 42 cells; leading and trailing cells spill into the
/// adjacent months.
pub fn month_grid(anchor: NaiveDate) -> Vec<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(anchor.year(), anchor.month(), 1).unwrap();
    let grid_start = start_of_week(first);

    (0..6)
        .map(|week| {
            (0..7)
                .map(|day| grid_start + Duration::days(week * 7 + day))
                .collect()
        })
        .collect()
}

/// Whether two dates fall in the same calendar month.
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_starts_on_sunday() {
        // 2024-01-10 was a Wednesday
        let wednesday = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let days = week_dates(wednesday);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
        assert_eq!(days[6], NaiveDate::from_ymd_opt(2024, 1, 13).unwrap());
        assert!(days.contains(&wednesday));
    }

    #[test]
    fn week_of_a_sunday_starts_on_itself() {
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(start_of_week(sunday), sunday);
    }

    #[test]
    fn month_grid_is_42_cells_starting_sunday() {
        let anchor = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
        let grid = month_grid(anchor);
        assert_eq!(grid.len(), 6);
        assert!(grid.iter().all(|week| week.len() == 7));
        // Feb 2024 starts on a Thursday; the grid opens on Sun Jan 28
        assert_eq!(grid[0][0], NaiveDate::from_ymd_opt(2024, 1, 28).unwrap());
        // every day of the month is present
        for day in 1..=29 {
            let date = NaiveDate::from_ymd_opt(2024, 2, day).unwrap();
            assert!(grid.iter().flatten().any(|d| *d == date));
        }
    }

    #[test]
    fn ymd_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(parse_ymd(&format_ymd(date)), Some(date));
        assert_eq!(parse_ymd("not-a-date"), None);
    }
}
