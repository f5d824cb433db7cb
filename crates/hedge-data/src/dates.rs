//! Date-window arithmetic for snapshot loading and backtesting

use crate::error::{DataError, Result};
use chrono::{Datelike, Days, NaiveDate, Weekday};

/// An inclusive date range for one snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Create a window, rejecting inverted ranges
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DataError::InvalidDateFormat(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Resolve optional user-supplied bounds against `today`
    ///
    /// The end date defaults to `today`; the start date defaults to three
    /// calendar months before the end date (month-field subtraction with
    /// year wrap, not a fixed 90-day offset).
    pub fn resolve(start: Option<NaiveDate>, end: Option<NaiveDate>, today: NaiveDate) -> Result<Self> {
        let end = end.unwrap_or(today);
        let start = start.unwrap_or_else(|| three_months_before(end));
        Self::new(start, end)
    }
}

/// Parse a user-supplied `YYYY-MM-DD` date string
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| DataError::InvalidDateFormat(input.to_string()))
}

/// Three calendar months before `date`, wrapping to the prior year when the
/// month subtraction goes non-positive
///
/// The day-of-month is kept, clamped to the target month's length when the
/// literal day does not exist (e.g. May 31 -> Feb 28).
pub fn three_months_before(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() > 3 {
        (date.year(), date.month() - 3)
    } else {
        (date.year() - 1, date.month() + 9)
    };
    let mut day = date.day();
    loop {
        if let Some(result) = NaiveDate::from_ymd_opt(year, month, day) {
            return result;
        }
        day -= 1;
    }
}

/// Business days (Monday through Friday) in the inclusive range
pub fn business_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(current);
        }
        match current.checked_add_days(Days::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_three_months_before_simple() {
        assert_eq!(three_months_before(date("2024-07-15")), date("2024-04-15"));
    }

    #[test]
    fn test_three_months_before_year_wrap() {
        assert_eq!(three_months_before(date("2024-02-10")), date("2023-11-10"));
        assert_eq!(three_months_before(date("2024-03-01")), date("2023-12-01"));
    }

    #[test]
    fn test_three_months_before_day_clamp() {
        // May 31 has no Feb 31 counterpart
        assert_eq!(three_months_before(date("2024-05-31")), date("2024-02-29"));
        assert_eq!(three_months_before(date("2023-05-31")), date("2023-02-28"));
    }

    #[test]
    fn test_resolve_defaults() {
        let today = date("2024-06-20");
        let window = DateWindow::resolve(None, None, today).unwrap();
        assert_eq!(window.end, today);
        assert_eq!(window.start, date("2024-03-20"));

        let window = DateWindow::resolve(Some(date("2024-06-01")), None, today).unwrap();
        assert_eq!(window.start, date("2024-06-01"));
    }

    #[test]
    fn test_inverted_window_rejected() {
        assert!(DateWindow::new(date("2024-06-01"), date("2024-05-01")).is_err());
    }

    #[test]
    fn test_parse_date_format() {
        assert!(parse_date("2024-06-01").is_ok());
        assert!(matches!(
            parse_date("06/01/2024"),
            Err(DataError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn test_business_days_skip_weekends() {
        // 2024-06-06 is a Thursday
        let days = business_days(date("2024-06-06"), date("2024-06-11"));
        assert_eq!(
            days,
            vec![date("2024-06-06"), date("2024-06-07"), date("2024-06-10"), date("2024-06-11")]
        );
    }
}
