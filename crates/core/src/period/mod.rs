//! Report periods: a year plus a set of months.
//!
//! A [`ReportPeriod`] is validated once at the request boundary and then
//! expanded into closed `[first-of-month, last-of-month]` intervals that the
//! query builder turns into a disjunction of date ranges.

mod error;

#[cfg(test)]
mod tests;

pub use error::PeriodError;

use chrono::NaiveDate;
use serde::Serialize;

/// Earliest year accepted in a report request.
pub const MIN_YEAR: i32 = 1900;
/// Latest year accepted in a report request.
pub const MAX_YEAR: i32 = 2999;

/// A closed date interval covering one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthRange {
    /// Month number (1-12).
    pub month: u32,
    /// First day of the month.
    pub start: NaiveDate,
    /// Last day of the month.
    pub end: NaiveDate,
}

impl MonthRange {
    /// Builds the interval for `month` of `year`.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidMonth` when `month` is outside 1-12 and
    /// `PeriodError::InvalidYear` when the year cannot be represented.
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(i64::from(month)));
        }
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or(PeriodError::InvalidYear(year.into()))?;
        let end = last_day_of_month(year, month).ok_or(PeriodError::InvalidYear(year.into()))?;
        Ok(Self { month, start, end })
    }

    /// Renders `column BETWEEN 'YYYY-MM-DD' AND 'YYYY-MM-DD'`.
    #[must_use]
    pub fn between(&self, column: &str) -> String {
        format!(
            "{column} BETWEEN '{}' AND '{}'",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Returns the last day of `month`: the day before the first of the next month.
#[must_use]
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Expands `months` of `year` into one interval per month, preserving order.
///
/// # Errors
///
/// Returns `PeriodError::NoMonths` for an empty list and
/// `PeriodError::InvalidMonth` for any month outside 1-12.
pub fn expand_months(year: i32, months: &[u32]) -> Result<Vec<MonthRange>, PeriodError> {
    if months.is_empty() {
        return Err(PeriodError::NoMonths);
    }
    months.iter().map(|&m| MonthRange::new(year, m)).collect()
}

/// A validated year and month selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPeriod {
    year: i32,
    ranges: Vec<MonthRange>,
}

impl ReportPeriod {
    /// Validates raw request values.
    ///
    /// Duplicate months are collapsed, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError` when the year is out of range, the month list is
    /// empty, or a month is outside 1-12.
    pub fn new(year: i32, months: &[i64]) -> Result<Self, PeriodError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(PeriodError::InvalidYear(year.into()));
        }
        if months.is_empty() {
            return Err(PeriodError::NoMonths);
        }

        let mut unique: Vec<u32> = Vec::with_capacity(months.len());
        for &raw in months {
            let month = u32::try_from(raw)
                .ok()
                .filter(|m| (1..=12).contains(m))
                .ok_or(PeriodError::InvalidMonth(raw))?;
            if !unique.contains(&month) {
                unique.push(month);
            }
        }

        Ok(Self {
            year,
            ranges: expand_months(year, &unique)?,
        })
    }

    /// Returns the year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month numbers in request order.
    #[must_use]
    pub fn months(&self) -> Vec<u32> {
        self.ranges.iter().map(|r| r.month).collect()
    }

    /// Returns the per-month intervals.
    #[must_use]
    pub fn ranges(&self) -> &[MonthRange] {
        &self.ranges
    }

    /// Renders the period as `(col BETWEEN .. OR col BETWEEN ..)`.
    ///
    /// Only validated dates reach the fragment, so it is safe to splice into
    /// SQL text; every other value stays a bound parameter.
    #[must_use]
    pub fn sql_predicate(&self, column: &str) -> String {
        let parts: Vec<String> = self.ranges.iter().map(|r| r.between(column)).collect();
        format!("({})", parts.join(" OR "))
    }
}
