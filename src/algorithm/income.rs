//! Nominal and real mean income
//!
//! The nominal aggregator is a weighted mean over rows where both income and
//! weight parse. The real series joins it with the quarterly price index.

use std::collections::BTreeMap;

use itertools::{EitherOrBoth, Itertools};
use log::debug;

use crate::models::{
    NominalIncomeRecord, PeriodKeyed, Period, PriceIndexRecord, QuarterlyIncomeRecord,
    SurveyRecord,
};
use crate::validation::{ExclusionReport, parse_income, parse_weight};

#[derive(Debug, Clone, Copy, Default)]
struct WeightedSum {
    numerator: f64,
    denominator: f64,
}

/// Weighted mean income per period
///
/// A row contributes only when both income and weight parse. Periods without a
/// contributing row, or whose weights sum to zero, are omitted.
pub fn compute_nominal_income<'a, I>(records: I) -> Vec<NominalIncomeRecord>
where
    I: IntoIterator<Item = &'a SurveyRecord>,
{
    compute_nominal_income_with_report(records).0
}

/// Weighted mean income per period, with the rows that were excluded
pub fn compute_nominal_income_with_report<'a, I>(
    records: I,
) -> (Vec<NominalIncomeRecord>, ExclusionReport)
where
    I: IntoIterator<Item = &'a SurveyRecord>,
{
    let mut report = ExclusionReport::new();
    let mut sums: BTreeMap<Period, WeightedSum> = BTreeMap::new();

    for record in records {
        let parsed = parse_income(record.income.as_deref())
            .and_then(|income| Ok((income, parse_weight(record.weight.as_deref())?)));

        match parsed {
            Ok((income, weight)) => {
                let sum = sums.entry(record.period).or_default();
                sum.numerator += income * weight;
                sum.denominator += weight;
                report.accept();
            }
            Err(reason) => report.exclude(reason),
        }
    }

    let series: Vec<NominalIncomeRecord> = sums
        .into_iter()
        .filter_map(|(period, sum)| {
            if sum.denominator == 0.0 {
                debug!("Skipping {period}: no weighted income rows");
                return None;
            }
            Some(NominalIncomeRecord {
                year: period.year,
                quarter: period.quarter,
                mean_nominal_income: sum.numerator / sum.denominator,
            })
        })
        .collect();

    (series, report)
}

/// Deflate nominal income by the cumulative price index
///
/// Inner join on period: quarters missing from either series are dropped, as
/// are quarters whose index is not positive or whose quotient is not finite.
/// Output is ordered by period.
#[must_use]
pub fn compute_real_income(
    nominal: &[NominalIncomeRecord],
    index: &[PriceIndexRecord],
) -> Vec<QuarterlyIncomeRecord> {
    let nominal = nominal.iter().sorted_by_key(|r| r.period());
    let index = index.iter().sorted_by_key(|r| r.period());

    nominal
        .merge_join_by(index, |n, i| n.period().cmp(&i.period()))
        .filter_map(|pair| match pair {
            EitherOrBoth::Both(n, i) => {
                let real = n.mean_nominal_income / i.cumulative_index;
                if i.cumulative_index <= 0.0 || !real.is_finite() {
                    debug!(
                        "Dropping {}: index {} does not deflate",
                        n.period(),
                        i.cumulative_index
                    );
                    return None;
                }
                Some(QuarterlyIncomeRecord {
                    year: n.year,
                    quarter: n.quarter,
                    mean_nominal_income: n.mean_nominal_income,
                    cumulative_index: i.cumulative_index,
                    mean_real_income: real,
                })
            }
            EitherOrBoth::Left(n) => {
                debug!("No price index for {}, dropping", n.period());
                None
            }
            EitherOrBoth::Right(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Exclusion;

    fn q(year: i32, quarter: u32) -> Period {
        Period::new(year, quarter).unwrap()
    }

    fn income_record(period: Period, income: &str, weight: &str) -> SurveyRecord {
        SurveyRecord::new(period)
            .with_income(income)
            .with_weight(weight)
    }

    fn nominal(year: i32, quarter: u32, value: f64) -> NominalIncomeRecord {
        NominalIncomeRecord {
            year,
            quarter,
            mean_nominal_income: value,
        }
    }

    fn index(year: i32, quarter: u32, value: f64) -> PriceIndexRecord {
        PriceIndexRecord {
            year,
            quarter,
            cumulative_index: value,
        }
    }

    #[test]
    fn test_weighted_mean() {
        let records = vec![
            income_record(q(2020, 1), "1000", "1"),
            income_record(q(2020, 1), "2000", "3"),
            income_record(q(2020, 2), "500", "2"),
        ];

        let series = compute_nominal_income(&records);
        assert_eq!(series.len(), 2);
        assert!((series[0].mean_nominal_income - 1750.0).abs() < 1e-9);
        assert!((series[1].mean_nominal_income - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_rows_leave_both_sums() {
        let records = vec![
            income_record(q(2020, 1), "1000", "1"),
            // unparseable income: its weight must not dilute the mean
            income_record(q(2020, 1), "", "100"),
            // unparseable weight: its income must not count
            income_record(q(2020, 1), "99999", "x"),
        ];

        let (series, report) = compute_nominal_income_with_report(&records);
        assert_eq!(series.len(), 1);
        assert!((series[0].mean_nominal_income - 1000.0).abs() < 1e-9);
        assert_eq!(report.accepted, 1);
        assert_eq!(report.count(Exclusion::UnparseableIncome), 1);
        assert_eq!(report.count(Exclusion::UnparseableWeight), 1);
    }

    #[test]
    fn test_period_without_valid_rows_is_absent() {
        let records = vec![
            income_record(q(2020, 1), "abc", "1"),
            income_record(q(2020, 2), "100", "0"),
            income_record(q(2020, 3), "100", "2"),
        ];

        let series = compute_nominal_income(&records);
        assert_eq!(series.len(), 1);
        assert_eq!((series[0].year, series[0].quarter), (2020, 3));
        assert!(series.iter().all(|r| r.mean_nominal_income.is_finite()));
    }

    #[test]
    fn test_real_income_inner_join() {
        let nominal_series = vec![
            nominal(2020, 1, 1000.0),
            nominal(2020, 2, 1100.0),
            nominal(2020, 3, 1300.0),
        ];
        let index_series = vec![index(2020, 2, 1.1), index(2020, 3, 1.3), index(2020, 4, 1.5)];

        let real = compute_real_income(&nominal_series, &index_series);
        assert_eq!(real.len(), 2);
        assert!(real.len() <= nominal_series.len().min(index_series.len()));
        assert!(!real.iter().any(|r| (r.year, r.quarter) == (2020, 1)));
        assert!((real[0].mean_real_income - 1000.0).abs() < 1e-9);
        assert!((real[1].mean_real_income - 1000.0).abs() < 1e-9);
        assert_eq!(real[1].cumulative_index, 1.3);
    }

    #[test]
    fn test_real_income_skips_collapsed_index() {
        use crate::algorithm::price_index::compute_quarterly_index;
        use crate::models::MonthlyInflationEntry;

        // a -100% month takes the second quarter's index to zero
        let monthly: Vec<MonthlyInflationEntry> = [1.0, 1.0, 1.0, -100.0, 1.0, 1.0]
            .iter()
            .enumerate()
            .map(|(i, &rate)| MonthlyInflationEntry::new(2020, u32::try_from(i).unwrap() + 1, rate))
            .collect();
        let index_series = compute_quarterly_index(&monthly);
        assert_eq!(index_series[1].cumulative_index, 0.0);

        let nominal_series = vec![nominal(2020, 1, 500.0), nominal(2020, 2, 0.0)];
        let real = compute_real_income(&nominal_series, &index_series);
        assert_eq!(real.len(), 1);
        assert_eq!((real[0].year, real[0].quarter), (2020, 1));

        let real = compute_real_income(&[nominal(2020, 2, 800.0)], &[index(2020, 2, 0.0)]);
        assert!(real.is_empty());
        let real = compute_real_income(&[nominal(2020, 2, 800.0)], &[index(2020, 2, -0.5)]);
        assert!(real.is_empty());
    }

    #[test]
    fn test_real_income_unsorted_inputs() {
        let nominal_series = vec![nominal(2021, 1, 200.0), nominal(2020, 4, 100.0)];
        let index_series = vec![index(2021, 1, 2.0), index(2020, 4, 1.0)];

        let real = compute_real_income(&nominal_series, &index_series);
        let periods: Vec<(i32, u32)> = real.iter().map(|r| (r.year, r.quarter)).collect();
        assert_eq!(periods, vec![(2020, 4), (2021, 1)]);
        assert!((real[1].mean_real_income - 100.0).abs() < 1e-9);
    }
}
