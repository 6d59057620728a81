//! Quarterly price index from monthly inflation
//!
//! Monthly rates are compounded into quarterly rates, the first quarter is
//! taken as the base (rate forced to zero), and the cumulative product of
//! `1 + rate` gives the deflator for every later quarter.

use std::collections::BTreeMap;

use log::{debug, warn};
use smallvec::SmallVec;

use crate::error::{IndicatorError, Result};
use crate::models::{MonthlyInflationEntry, Period, PriceIndexRecord, QuarterlyInflationRecord};

const MONTHS_PER_QUARTER: usize = 3;

/// How monthly entries are grouped into quarters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompoundingPolicy {
    /// Consecutive groups of three entries in input order, labelled 1-4 in
    /// sequence starting at 1. A missing month shifts every later boundary.
    #[default]
    Positional,
    /// Entries grouped by the calendar quarter of their (year, month). Only
    /// quarters with all three months present are emitted.
    Calendar,
}

/// Compound monthly entries into a quarterly rate (`Π(1 + r/100) - 1`)
///
/// Returns `None` when any monthly rate is not finite.
#[must_use]
pub fn compound_rates(months: &[MonthlyInflationEntry]) -> Option<f64> {
    if months.iter().any(|m| !m.rate.is_finite()) {
        return None;
    }
    Some(
        months
            .iter()
            .map(MonthlyInflationEntry::factor)
            .product::<f64>()
            - 1.0,
    )
}

/// Quarterly compounded rates using positional grouping
///
/// Groups with a non-finite rate are skipped and do not advance the quarter
/// label; a trailing partial group is dropped.
#[must_use]
pub fn compute_quarterly_rates(monthly: &[MonthlyInflationEntry]) -> Vec<QuarterlyInflationRecord> {
    let mut quarter = 1;
    let mut rates = Vec::with_capacity(monthly.len() / MONTHS_PER_QUARTER);

    let remainder = monthly.len() % MONTHS_PER_QUARTER;
    if remainder != 0 {
        debug!("Dropping {remainder} trailing months of an incomplete quarter");
    }

    for group in monthly.chunks_exact(MONTHS_PER_QUARTER) {
        let Some(rate) = compound_rates(group) else {
            warn!(
                "Skipping quarter starting {}-{:02}: non-finite monthly rate",
                group[0].year, group[0].month
            );
            continue;
        };

        rates.push(QuarterlyInflationRecord {
            year: group[0].year,
            quarter,
            rate,
        });
        quarter = if quarter < 4 { quarter + 1 } else { 1 };
    }

    rates
}

/// Quarterly compounded rates grouped by calendar quarter
///
/// Fails on months outside 1-12. Quarters with fewer than three distinct
/// months, or with a non-finite rate, are skipped.
pub fn compute_calendar_quarterly_rates(
    monthly: &[MonthlyInflationEntry],
) -> Result<Vec<QuarterlyInflationRecord>> {
    let mut by_quarter: BTreeMap<Period, BTreeMap<u32, MonthlyInflationEntry>> = BTreeMap::new();

    for entry in monthly {
        let period = Period::from_month(entry.year, entry.month)
            .map_err(|e| IndicatorError::InvalidInflationSeries(e.to_string()))?;
        by_quarter
            .entry(period)
            .or_default()
            .insert(entry.month, *entry);
    }

    let rates = by_quarter
        .into_iter()
        .filter_map(|(period, months)| {
            if months.len() < MONTHS_PER_QUARTER {
                debug!("Skipping {period}: only {} months present", months.len());
                return None;
            }
            let group: SmallVec<[MonthlyInflationEntry; MONTHS_PER_QUARTER]> =
                months.into_values().collect();
            compound_rates(&group).map(|rate| QuarterlyInflationRecord {
                year: period.year,
                quarter: period.quarter,
                rate,
            })
        })
        .collect();

    Ok(rates)
}

/// Turn quarterly rates into a cumulative index anchored at the first quarter
///
/// The first rate is overridden with zero, so the first index is exactly 1.0.
#[must_use]
pub fn cumulative_index(rates: &[QuarterlyInflationRecord]) -> Vec<PriceIndexRecord> {
    rates
        .iter()
        .enumerate()
        .scan(1.0_f64, |index, (i, q)| {
            let rate = if i == 0 { 0.0 } else { q.rate };
            *index *= 1.0 + rate;
            Some(PriceIndexRecord {
                year: q.year,
                quarter: q.quarter,
                cumulative_index: *index,
            })
        })
        .collect()
}

/// Quarterly cumulative price index from a chronologically ordered monthly series
#[must_use]
pub fn compute_quarterly_index(monthly: &[MonthlyInflationEntry]) -> Vec<PriceIndexRecord> {
    cumulative_index(&compute_quarterly_rates(monthly))
}

/// Quarterly cumulative price index using the given grouping policy
pub fn compute_quarterly_index_with(
    monthly: &[MonthlyInflationEntry],
    policy: CompoundingPolicy,
) -> Result<Vec<PriceIndexRecord>> {
    let rates = match policy {
        CompoundingPolicy::Positional => compute_quarterly_rates(monthly),
        CompoundingPolicy::Calendar => compute_calendar_quarterly_rates(monthly)?,
    };
    Ok(cumulative_index(&rates))
}

/// Check that entries are valid months in strictly consecutive order
pub fn validate_month_contiguity(monthly: &[MonthlyInflationEntry]) -> Result<()> {
    if let Some(bad) = monthly.iter().find(|m| !(1..=12).contains(&m.month)) {
        return Err(IndicatorError::InvalidInflationSeries(format!(
            "month {} of {} is outside 1-12",
            bad.month, bad.year
        )));
    }

    for pair in monthly.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.month_index() != prev.month_index() + 1 {
            return Err(IndicatorError::InvalidInflationSeries(format!(
                "{}-{:02} does not follow {}-{:02}",
                next.year, next.month, prev.year, prev.month
            )));
        }
    }

    Ok(())
}
