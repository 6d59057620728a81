//! Labor-market rates
//!
//! Weighted activity, employment and unemployment rates per survey period.

use std::collections::BTreeMap;

use log::debug;

use crate::config::DEFAULT_MIN_WORKING_AGE;
use crate::models::{LaborState, Period, QuarterlyRateRecord, SurveyRecord};
use crate::validation::{
    Exclusion, ExclusionReport, classify_labor_code, parse_labor_code, parse_weight,
    parse_working_age,
};

/// Weighted population totals of one period
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LaborTotals {
    pub employed: f64,
    pub unemployed: f64,
    pub inactive: f64,
}

impl LaborTotals {
    /// Add a weighted respondent
    pub fn add(&mut self, state: LaborState, weight: f64) {
        match state {
            LaborState::Employed => self.employed += weight,
            LaborState::Unemployed => self.unemployed += weight,
            LaborState::Inactive => self.inactive += weight,
        }
    }

    /// Employed plus unemployed
    #[must_use]
    pub fn labor_force(&self) -> f64 {
        self.employed + self.unemployed
    }

    /// Labor force plus inactive
    #[must_use]
    pub fn population(&self) -> f64 {
        self.labor_force() + self.inactive
    }

    /// Rates for the period, or `None` when population or labor force is zero
    #[must_use]
    pub fn rates(&self, period: Period) -> Option<QuarterlyRateRecord> {
        let labor_force = self.labor_force();
        let population = self.population();

        if population == 0.0 || labor_force == 0.0 {
            return None;
        }

        Some(QuarterlyRateRecord {
            year: period.year,
            quarter: period.quarter,
            activity_pct: 100.0 * labor_force / population,
            employment_pct: 100.0 * self.employed / population,
            unemployment_pct: 100.0 * self.unemployed / labor_force,
        })
    }
}

/// Validate one record for rate computation
///
/// Checks run in pipeline order: state and weight parse, working age, then
/// known state code.
pub fn classify_record(
    record: &SurveyRecord,
    min_working_age: f64,
) -> Result<(LaborState, f64), Exclusion> {
    let code = parse_labor_code(record.labor_state.as_deref())?;
    let weight = parse_weight(record.weight.as_deref())?;
    parse_working_age(record.age.as_deref(), min_working_age)?;
    let state = classify_labor_code(code)?;
    Ok((state, weight))
}

/// Weighted labor totals per period
pub fn labor_totals<'a, I>(
    records: I,
    min_working_age: f64,
    report: &mut ExclusionReport,
) -> BTreeMap<Period, LaborTotals>
where
    I: IntoIterator<Item = &'a SurveyRecord>,
{
    let mut totals: BTreeMap<Period, LaborTotals> = BTreeMap::new();

    for record in records {
        match classify_record(record, min_working_age) {
            Ok((state, weight)) => {
                totals.entry(record.period).or_default().add(state, weight);
                report.accept();
            }
            Err(reason) => report.exclude(reason),
        }
    }

    totals
}

/// Compute rates per period with the survey's working-age threshold
///
/// Malformed rows are left out silently; periods with an empty population or
/// labor force are omitted. Output is ordered by period.
pub fn compute_rates<'a, I>(records: I) -> Vec<QuarterlyRateRecord>
where
    I: IntoIterator<Item = &'a SurveyRecord>,
{
    compute_rates_with_report(records, DEFAULT_MIN_WORKING_AGE).0
}

/// Compute rates per period and report which rows were excluded
pub fn compute_rates_with_report<'a, I>(
    records: I,
    min_working_age: f64,
) -> (Vec<QuarterlyRateRecord>, ExclusionReport)
where
    I: IntoIterator<Item = &'a SurveyRecord>,
{
    let mut report = ExclusionReport::new();
    let totals = labor_totals(records, min_working_age, &mut report);

    let rates: Vec<QuarterlyRateRecord> = totals
        .iter()
        .filter_map(|(period, totals)| {
            let rates = totals.rates(*period);
            if rates.is_none() {
                debug!("Skipping {period}: empty population or labor force");
            }
            rates
        })
        .collect();

    debug!("Computed rates for {} periods ({report})", rates.len());
    (rates, report)
}
