//! Tests for month expansion and period predicates.

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;
use rstest::rstest;

use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[rstest]
#[case(2024, 2, 29)]
#[case(2023, 2, 28)]
#[case(2000, 2, 29)]
#[case(1900, 2, 28)]
#[case(2024, 1, 31)]
#[case(2024, 4, 30)]
#[case(2024, 12, 31)]
fn test_last_day_of_month(#[case] year: i32, #[case] month: u32, #[case] day: u32) {
    assert_eq!(last_day_of_month(year, month), Some(date(year, month, day)));
}

#[test]
fn test_expand_months_preserves_order() {
    let ranges = expand_months(2024, &[3, 1]).unwrap();

    assert_eq!(ranges.len(), 2);
    assert_eq!(ranges[0].month, 3);
    assert_eq!(ranges[0].start, date(2024, 3, 1));
    assert_eq!(ranges[0].end, date(2024, 3, 31));
    assert_eq!(ranges[1].month, 1);
}

#[test]
fn test_expand_months_rejects_empty_list() {
    assert_eq!(expand_months(2024, &[]), Err(PeriodError::NoMonths));
}

#[test]
fn test_expand_months_rejects_month_13() {
    assert_eq!(expand_months(2024, &[13]), Err(PeriodError::InvalidMonth(13)));
}

#[rstest]
#[case(&[0])]
#[case(&[13])]
#[case(&[-1])]
#[case(&[1, 2, 99])]
fn test_report_period_rejects_out_of_range_months(#[case] months: &[i64]) {
    assert!(matches!(
        ReportPeriod::new(2024, months),
        Err(PeriodError::InvalidMonth(_))
    ));
}

#[rstest]
#[case(1899)]
#[case(3000)]
#[case(0)]
fn test_report_period_rejects_out_of_range_year(#[case] year: i32) {
    assert_eq!(
        ReportPeriod::new(year, &[1]),
        Err(PeriodError::InvalidYear(year.into()))
    );
}

#[test]
fn test_report_period_collapses_duplicates() {
    let period = ReportPeriod::new(2024, &[2, 1, 2]).unwrap();

    assert_eq!(period.months(), vec![2, 1]);
    assert_eq!(period.year(), 2024);
}

#[test]
fn test_sql_predicate_is_zero_padded_disjunction() {
    let period = ReportPeriod::new(2024, &[1, 2]).unwrap();

    assert_eq!(
        period.sql_predicate("dent_ent"),
        "(dent_ent BETWEEN '2024-01-01' AND '2024-01-31' OR dent_ent BETWEEN '2024-02-01' AND '2024-02-29')"
    );
}

proptest! {
    /// Every interval starts on day 1 and ends on the day before the next month starts.
    #[test]
    fn prop_one_interval_per_month_with_correct_bounds(
        year in MIN_YEAR..=MAX_YEAR,
        months in proptest::collection::vec(1u32..=12, 1..12),
    ) {
        let ranges = expand_months(year, &months).unwrap();
        prop_assert_eq!(ranges.len(), months.len());

        for (range, &month) in ranges.iter().zip(&months) {
            prop_assert_eq!(range.month, month);
            prop_assert_eq!(range.start.day(), 1);
            prop_assert_eq!(range.start.month(), month);
            prop_assert_eq!(range.end.month(), month);
            let next = range.end.succ_opt().unwrap();
            prop_assert_eq!(next.day(), 1);
            prop_assert!(range.start <= range.end);
        }
    }

    /// The rendered predicate only ever contains ten-character ISO dates.
    #[test]
    fn prop_predicate_dates_are_padded(
        year in MIN_YEAR..=MAX_YEAR,
        month in 1i64..=12,
    ) {
        let predicate = ReportPeriod::new(year, &[month]).unwrap().sql_predicate("d");
        let quoted: Vec<&str> = predicate.split('\'').skip(1).step_by(2).collect();
        prop_assert_eq!(quoted.len(), 2);
        for literal in quoted {
            prop_assert_eq!(literal.len(), 10);
            prop_assert!(NaiveDate::parse_from_str(literal, "%Y-%m-%d").is_ok());
        }
    }
}
