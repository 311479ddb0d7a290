// ABOUTME: Attendance filter windows resolved against a fixed reference date
// ABOUTME: Also holds the date formatting and percentage rounding shared by the reports

use chrono::{Duration, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterWindow {
    #[default]
    Today,
    Week,
    Month,
}

impl FilterWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterWindow::Today => "today",
            FilterWindow::Week => "week",
            FilterWindow::Month => "month",
        }
    }

    /// Number of days covered, reference date included.
    pub fn span_days(&self) -> i64 {
        match self {
            FilterWindow::Today => 1,
            FilterWindow::Week => 7,
            FilterWindow::Month => 30,
        }
    }

    pub fn resolve(&self, reference: NaiveDate) -> DateRange {
        DateRange {
            start: reference - Duration::days(self.span_days() - 1),
            end: reference,
        }
    }

    /// Parses an optional query value, treating absence as `today`.
    pub fn from_query(raw: Option<&str>) -> Result<Self, AppError> {
        match raw {
            None => Ok(Self::default()),
            Some(value) => value
                .parse()
                .map_err(|_| AppError::BadRequest("Invalid filter type".to_string())),
        }
    }
}

impl fmt::Display for FilterWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(FilterWindow::Today),
            "week" => Ok(FilterWindow::Week),
            "month" => Ok(FilterWindow::Month),
            other => Err(format!("unknown filter window: {other}")),
        }
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// `part / total * 100` rounded to one decimal; 0 when `total` is 0.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = part as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 30).unwrap()
    }

    #[test]
    fn test_windows_resolve_against_reference() {
        let today = FilterWindow::Today.resolve(reference());
        assert_eq!(today.start, reference());
        assert_eq!(today.end, reference());

        let week = FilterWindow::Week.resolve(reference());
        assert_eq!(week.start, NaiveDate::from_ymd_opt(2025, 4, 24).unwrap());
        assert_eq!(week.days().count(), 7);

        let month = FilterWindow::Month.resolve(reference());
        assert_eq!(month.start, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        assert_eq!(month.days().count(), 30);
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!(FilterWindow::from_query(None).unwrap(), FilterWindow::Today);
        assert_eq!(
            FilterWindow::from_query(Some("week")).unwrap(),
            FilterWindow::Week
        );
        assert!(matches!(
            FilterWindow::from_query(Some("year")),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_percentage_rounding_and_zero_total() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 2), 50.0);
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(3, 3), 100.0);
    }

    #[test]
    fn test_display_date_format() {
        assert_eq!(format_display_date(reference()), "30-04-2025");
    }
}
