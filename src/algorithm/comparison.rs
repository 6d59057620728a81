//! Side-by-side series for two geographies or two slices
//!
//! A comparison joins two series of the same indicator on period and keeps only
//! the quarters present in both.

use std::fmt;

use itertools::{EitherOrBoth, Itertools};
use serde::{Deserialize, Serialize};

use crate::models::{
    NominalIncomeRecord, Period, PeriodKeyed, QuarterlyIncomeRecord, QuarterlyRateRecord,
};

/// Indicator a comparison is made on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    Activity,
    Employment,
    Unemployment,
    NominalIncome,
    RealIncome,
}

impl Indicator {
    /// Column name used in exported series
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Activity => "activity_pct",
            Self::Employment => "employment_pct",
            Self::Unemployment => "unemployment_pct",
            Self::NominalIncome => "mean_nominal_income",
            Self::RealIncome => "mean_real_income",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Series rows that carry a value for an indicator
pub trait IndicatorSeries: PeriodKeyed {
    /// Value of the indicator, or `None` if this row type does not carry it
    fn value(&self, indicator: Indicator) -> Option<f64>;
}

impl IndicatorSeries for QuarterlyRateRecord {
    fn value(&self, indicator: Indicator) -> Option<f64> {
        match indicator {
            Indicator::Activity => Some(self.activity_pct),
            Indicator::Employment => Some(self.employment_pct),
            Indicator::Unemployment => Some(self.unemployment_pct),
            Indicator::NominalIncome | Indicator::RealIncome => None,
        }
    }
}

impl IndicatorSeries for NominalIncomeRecord {
    fn value(&self, indicator: Indicator) -> Option<f64> {
        (indicator == Indicator::NominalIncome).then_some(self.mean_nominal_income)
    }
}

impl IndicatorSeries for QuarterlyIncomeRecord {
    fn value(&self, indicator: Indicator) -> Option<f64> {
        match indicator {
            Indicator::NominalIncome => Some(self.mean_nominal_income),
            Indicator::RealIncome => Some(self.mean_real_income),
            _ => None,
        }
    }
}

/// One period of a two-series comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub year: i32,
    pub quarter: u32,
    pub left: f64,
    pub right: f64,
}

fn indicator_values<T: IndicatorSeries>(series: &[T], indicator: Indicator) -> Vec<(Period, f64)> {
    series
        .iter()
        .filter_map(|row| row.value(indicator).map(|v| (row.period(), v)))
        .sorted_by_key(|(period, _)| *period)
        .collect()
}

/// Join two series on period for one indicator
///
/// Periods present in only one series are dropped. Output is ordered by period.
pub fn compare_series<L, R>(left: &[L], right: &[R], indicator: Indicator) -> Vec<ComparisonRow>
where
    L: IndicatorSeries,
    R: IndicatorSeries,
{
    indicator_values(left, indicator)
        .into_iter()
        .merge_join_by(indicator_values(right, indicator), |(l, _), (r, _)| l.cmp(r))
        .filter_map(|pair| match pair {
            EitherOrBoth::Both((period, left), (_, right)) => Some(ComparisonRow {
                year: period.year,
                quarter: period.quarter,
                left,
                right,
            }),
            _ => None,
        })
        .collect()
}

/// Value of an indicator in the latest period of a series
#[must_use]
pub fn latest_value<T>(series: &[T], indicator: Indicator) -> Option<(Period, f64)>
where
    T: IndicatorSeries,
{
    series
        .iter()
        .filter_map(|row| row.value(indicator).map(|v| (row.period(), v)))
        .max_by_key(|(period, _)| *period)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates(year: i32, quarter: u32, activity: f64) -> QuarterlyRateRecord {
        QuarterlyRateRecord {
            year,
            quarter,
            activity_pct: activity,
            employment_pct: activity / 2.0,
            unemployment_pct: 10.0,
        }
    }

    fn income(year: i32, quarter: u32, real: f64) -> QuarterlyIncomeRecord {
        QuarterlyIncomeRecord {
            year,
            quarter,
            mean_nominal_income: real * 2.0,
            cumulative_index: 2.0,
            mean_real_income: real,
        }
    }

    #[test]
    fn test_compare_keeps_common_periods() {
        let mendoza = vec![rates(2020, 2, 60.0), rates(2020, 1, 55.0)];
        let gba = vec![rates(2020, 1, 65.0), rates(2020, 3, 70.0)];

        let rows = compare_series(&mendoza, &gba, Indicator::Activity);
        assert_eq!(rows.len(), 1);
        assert_eq!((rows[0].year, rows[0].quarter), (2020, 1));
        assert_eq!(rows[0].left, 55.0);
        assert_eq!(rows[0].right, 65.0);

        let employment = compare_series(&mendoza, &gba, Indicator::Employment);
        assert_eq!(employment[0].left, 27.5);
    }

    #[test]
    fn test_indicator_not_carried_by_series() {
        let series = vec![rates(2020, 1, 55.0)];
        assert!(compare_series(&series, &series, Indicator::RealIncome).is_empty());
        assert_eq!(latest_value(&series, Indicator::NominalIncome), None);
    }

    #[test]
    fn test_latest_value() {
        let series = vec![income(2021, 1, 300.0), income(2021, 4, 250.0), income(2021, 2, 280.0)];
        let (period, value) = latest_value(&series, Indicator::RealIncome).unwrap();
        assert_eq!(period, Period::new(2021, 4).unwrap());
        assert_eq!(value, 250.0);
        assert_eq!(latest_value::<QuarterlyIncomeRecord>(&[], Indicator::RealIncome), None);
    }
}
