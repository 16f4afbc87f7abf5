use crate::error::ValidationError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem::replace;

/// Date format used in Earth Engine date filters and table exports: "YYYY-MM-DD"
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single aggregation bucket: a calendar year or a calendar month.
///
/// Ordering is chronological. Monthly and yearly periods are never mixed in
/// one series, so comparing a `Year` with a `Month` only has to be total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Period {
    Year(i32),
    Month { year: i32, month: u32 },
}

impl Period {
    pub fn month(year: i32, month: u32) -> Result<Self, ValidationError> {
        if (1..=12).contains(&month) {
            Ok(Period::Month { year, month })
        } else {
            Err(ValidationError::InvalidMonth(month))
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            Period::Year(year) => *year,
            Period::Month { year, .. } => *year,
        }
    }

    /// First day of the period.
    pub fn start_date(&self) -> NaiveDate {
        match *self {
            Period::Year(year) => first_of_month(year, 1),
            Period::Month { year, month } => first_of_month(year, month),
        }
    }

    /// First day after the period. Date filters use `[start, end)`.
    pub fn end_date_exclusive(&self) -> NaiveDate {
        match *self {
            Period::Year(year) => first_of_month(year + 1, 1),
            Period::Month { year, month } => {
                let (y, m) = next_month(year, month);
                first_of_month(y, m)
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Year(year) => write!(f, "{year}"),
            Period::Month { year, month } => write!(f, "{year}-{month:02}"),
        }
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// An iterator over consecutive `(year, month)` pairs, inclusive on both ends.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct MonthRange(pub (i32, u32), pub (i32, u32));

impl Iterator for MonthRange {
    type Item = Period;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 <= self.1 {
            let next = next_month(self.0 .0, self.0 .1);
            let (year, month) = replace(&mut self.0, next);
            Some(Period::Month { year, month })
        } else {
            None
        }
    }
}

/// The user-selected analysis window. Construction guarantees `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl AnalysisPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::StartNotBeforeEnd { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Every calendar year touched by the window, ascending.
    pub fn years(&self) -> Vec<Period> {
        (self.start.year()..=self.end.year()).map(Period::Year).collect()
    }

    /// Every `(year, month)` of the touched years, chronological, 12 per year.
    pub fn months(&self) -> Vec<Period> {
        MonthRange((self.start.year(), 1), (self.end.year(), 12)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_start_not_before_end() {
        let same = AnalysisPeriod::new(date(2020, 1, 1), date(2020, 1, 1));
        assert!(matches!(same, Err(ValidationError::StartNotBeforeEnd { .. })));
        let reversed = AnalysisPeriod::new(date(2021, 1, 1), date(2020, 1, 1));
        assert!(reversed.is_err());
    }

    #[test]
    fn years_are_inclusive_and_ascending() {
        let period = AnalysisPeriod::new(date(2015, 1, 1), date(2017, 12, 31)).unwrap();
        assert_eq!(
            period.years(),
            vec![Period::Year(2015), Period::Year(2016), Period::Year(2017)]
        );
    }

    #[test]
    fn months_cover_every_year_month_once() {
        let period = AnalysisPeriod::new(date(2015, 1, 1), date(2017, 12, 31)).unwrap();
        let months = period.months();
        assert_eq!(months.len(), 36);
        assert_eq!(months[0], Period::Month { year: 2015, month: 1 });
        assert_eq!(months[35], Period::Month { year: 2017, month: 12 });
        assert!(months.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn partial_year_window_still_covers_whole_years() {
        let period = AnalysisPeriod::new(date(2019, 6, 10), date(2020, 2, 1)).unwrap();
        assert_eq!(period.years().len(), 2);
        assert_eq!(period.months().len(), 24);
    }

    #[test]
    fn month_range_crosses_year_boundary() {
        let months: Vec<Period> = MonthRange((2019, 11), (2020, 2)).collect();
        assert_eq!(months.len(), 4);
        assert_eq!(months[2], Period::Month { year: 2020, month: 1 });
    }

    #[test]
    fn month_range_empty() {
        assert_eq!(MonthRange((2020, 3), (2020, 2)).count(), 0);
    }

    #[test]
    fn period_windows_are_half_open() {
        let december = Period::month(2016, 12).unwrap();
        assert_eq!(december.start_date(), date(2016, 12, 1));
        assert_eq!(december.end_date_exclusive(), date(2017, 1, 1));
        let year = Period::Year(2016);
        assert_eq!(year.end_date_exclusive(), date(2017, 1, 1));
    }

    #[test]
    fn period_rejects_bad_month() {
        assert_eq!(Period::month(2016, 13), Err(ValidationError::InvalidMonth(13)));
    }

    #[test]
    fn period_display() {
        assert_eq!(Period::Year(2016).to_string(), "2016");
        assert_eq!(Period::month(2016, 6).unwrap().to_string(), "2016-06");
    }
}
