//! Analysis context shared by every series of a run
//!
//! The context owns the configuration and the quarterly price index, which is
//! computed once from the monthly inflation table and reused read-only by every
//! real-income series, including from parallel workers.

use std::collections::BTreeMap;

use log::{info, warn};
use rayon::prelude::*;

use crate::algorithm::income::{compute_nominal_income_with_report, compute_real_income};
use crate::algorithm::price_index::{compute_quarterly_index_with, validate_month_contiguity};
use crate::algorithm::rates::compute_rates_with_report;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::models::{
    MonthlyInflationEntry, NominalIncomeRecord, PriceIndexRecord, QuarterlyIncomeRecord,
    QuarterlyRateRecord, Sex, Slice, SurveyRecord, Zone,
};
use crate::provider::{RecordProvider, collect_records};
use crate::utils::logging::log_exclusions;

/// Series computed for one slice of a geography
#[derive(Debug, Clone, PartialEq)]
pub struct SliceIndicators {
    pub slice: Slice,
    pub rates: Vec<QuarterlyRateRecord>,
    pub real_income: Vec<QuarterlyIncomeRecord>,
}

/// Every series computed for one geography
#[derive(Debug, Clone, PartialEq)]
pub struct GeographyIndicators {
    pub geography: String,
    /// Survey records the series were computed from
    pub records: usize,
    pub overall: SliceIndicators,
    pub by_sex: Vec<SliceIndicators>,
    /// Empty when the records carry no zone
    pub by_zone: Vec<SliceIndicators>,
}

/// Configuration plus the memoized price index
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    config: AnalysisConfig,
    price_index: Vec<PriceIndexRecord>,
}

impl AnalysisContext {
    /// Build a context, compounding the monthly series with the configured policy
    pub fn new(config: AnalysisConfig, monthly: &[MonthlyInflationEntry]) -> Result<Self> {
        if let Err(e) = validate_month_contiguity(monthly) {
            warn!("Monthly inflation is not contiguous, quarter boundaries may shift: {e}");
        }

        let price_index = compute_quarterly_index_with(monthly, config.compounding)?;
        info!(
            "Price index covers {} quarters from {} monthly entries",
            price_index.len(),
            monthly.len()
        );

        Ok(Self::from_price_index(config, price_index))
    }

    /// Build a context around an already computed price index
    #[must_use]
    pub fn from_price_index(config: AnalysisConfig, price_index: Vec<PriceIndexRecord>) -> Self {
        Self {
            config,
            price_index,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    #[must_use]
    pub fn price_index(&self) -> &[PriceIndexRecord] {
        &self.price_index
    }

    /// Labor rates of a slice, outside the configured year range excluded
    #[must_use]
    pub fn rates(&self, records: &[SurveyRecord], slice: Slice) -> Vec<QuarterlyRateRecord> {
        let selected = self.select(records, slice);
        let (rates, report) = compute_rates_with_report(selected, self.config.min_working_age);
        log_exclusions(&format!("rates ({})", slice.label()), &report);
        rates
    }

    /// Weighted mean nominal income of a slice
    #[must_use]
    pub fn nominal_income(
        &self,
        records: &[SurveyRecord],
        slice: Slice,
    ) -> Vec<NominalIncomeRecord> {
        let selected = self.select(records, slice);
        let (series, report) = compute_nominal_income_with_report(selected);
        log_exclusions(&format!("income ({})", slice.label()), &report);
        series
    }

    /// Deflate a nominal series by the context's price index
    #[must_use]
    pub fn deflate(&self, nominal: &[NominalIncomeRecord]) -> Vec<QuarterlyIncomeRecord> {
        compute_real_income(nominal, &self.price_index)
    }

    /// Nominal and real income of a slice
    #[must_use]
    pub fn real_income(
        &self,
        records: &[SurveyRecord],
        slice: Slice,
    ) -> Vec<QuarterlyIncomeRecord> {
        self.deflate(&self.nominal_income(records, slice))
    }

    /// Rates and real income of one slice
    #[must_use]
    pub fn slice_indicators(&self, records: &[SurveyRecord], slice: Slice) -> SliceIndicators {
        SliceIndicators {
            slice,
            rates: self.rates(records, slice),
            real_income: self.real_income(records, slice),
        }
    }

    /// Indicators for each sex
    #[must_use]
    pub fn by_sex(&self, records: &[SurveyRecord]) -> Vec<SliceIndicators> {
        Sex::ALL
            .into_iter()
            .map(|sex| self.slice_indicators(records, Slice::Sex(sex)))
            .collect()
    }

    /// Indicators for each zone, empty when no record carries a zone
    #[must_use]
    pub fn by_zone(&self, records: &[SurveyRecord]) -> Vec<SliceIndicators> {
        if records.iter().all(|r| r.zone.is_none()) {
            return Vec::new();
        }
        Zone::ALL
            .into_iter()
            .map(|zone| self.slice_indicators(records, Slice::Zone(zone)))
            .collect()
    }

    /// Every series of a geography from the records a provider holds
    pub fn analyze_geography<P>(&self, provider: &P, geography: &str) -> Result<GeographyIndicators>
    where
        P: RecordProvider + ?Sized,
    {
        self.config.geography_code(geography)?;
        let records = collect_records(provider, geography, self.config.years())?;

        Ok(GeographyIndicators {
            geography: geography.to_string(),
            records: records.len(),
            overall: self.slice_indicators(&records, Slice::All),
            by_sex: self.by_sex(&records),
            by_zone: self.by_zone(&records),
        })
    }

    /// Analyze several geographies in parallel
    ///
    /// Runs on a dedicated pool sized by the configured thread count. The first
    /// failing geography fails the call.
    pub fn analyze_geographies<P>(
        &self,
        provider: &P,
        geographies: &[&str],
    ) -> Result<BTreeMap<String, GeographyIndicators>>
    where
        P: RecordProvider + ?Sized,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.worker_threads())
            .build()?;

        let results: Vec<GeographyIndicators> = pool.install(|| {
            geographies
                .par_iter()
                .map(|geography| self.analyze_geography(provider, geography))
                .collect::<Result<Vec<_>>>()
        })?;

        Ok(results
            .into_iter()
            .map(|indicators| (indicators.geography.clone(), indicators))
            .collect())
    }

    fn select<'a>(&self, records: &'a [SurveyRecord], slice: Slice) -> Vec<&'a SurveyRecord> {
        slice
            .select(records)
            .into_iter()
            .filter(|r| self.config.contains_year(r.period.year))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Period;
    use crate::provider::InMemoryProvider;

    fn person(period: Period, state: &str, sex: &str, weight: &str, income: &str) -> SurveyRecord {
        SurveyRecord::new(period)
            .with_labor_state(state)
            .with_age("35")
            .with_sex(sex)
            .with_weight(weight)
            .with_income(income)
    }

    fn monthly() -> Vec<MonthlyInflationEntry> {
        (1..=6)
            .map(|m| MonthlyInflationEntry::new(2020, m, 10.0))
            .collect()
    }

    fn context() -> AnalysisContext {
        let config = AnalysisConfig {
            first_year: 2020,
            last_year: 2020,
            threads: Some(2),
            ..AnalysisConfig::default()
        };
        AnalysisContext::new(config, &monthly()).unwrap()
    }

    #[test]
    fn test_price_index_is_memoized() {
        let ctx = context();
        assert_eq!(ctx.price_index().len(), 2);
        assert_eq!(ctx.price_index()[0].cumulative_index, 1.0);
        assert!((ctx.price_index()[1].cumulative_index - 1.1_f64.powi(3)).abs() < 1e-12);
    }

    #[test]
    fn test_slices_and_year_range() {
        let ctx = context();
        let q1 = Period::new(2020, 1).unwrap();
        let q2 = Period::new(2020, 2).unwrap();
        let records = vec![
            person(q1, "1", "1", "10", "1000"),
            person(q1, "2", "2", "10", "0"),
            person(q2, "1", "1", "10", "2662"),
            // outside the configured years
            person(Period::new(2019, 4).unwrap(), "1", "1", "10", "5"),
        ];

        let all = ctx.rates(&records, Slice::All);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].unemployment_pct, 50.0);

        let male = ctx.rates(&records, Slice::Sex(Sex::Male));
        assert_eq!(male[0].unemployment_pct, 0.0);

        let real = ctx.real_income(&records, Slice::Sex(Sex::Male));
        assert_eq!(real.len(), 2);
        assert!((real[1].mean_real_income - 2000.0).abs() < 1e-9);

        assert!(ctx.by_zone(&records).is_empty());
        assert_eq!(ctx.by_sex(&records).len(), 2);
    }

    #[test]
    fn test_analyze_geographies() {
        let ctx = context();
        let q1 = Period::new(2020, 1).unwrap();
        let provider = InMemoryProvider::new()
            .with_records(
                "gba",
                vec![
                    person(q1, "1", "1", "3", "100").with_zone(Zone::Urban),
                    person(q1, "3", "2", "1", "0").with_zone(Zone::Rural),
                ],
            )
            .with_records("gran_mendoza", vec![person(q1, "1", "2", "1", "50")]);

        let results = ctx
            .analyze_geographies(&provider, &["gba", "gran_mendoza"])
            .unwrap();
        assert_eq!(results.len(), 2);

        let gba = &results["gba"];
        assert_eq!(gba.records, 2);
        assert_eq!(gba.overall.rates[0].activity_pct, 75.0);
        assert_eq!(gba.by_zone.len(), 2);
        assert!(results["gran_mendoza"].by_zone.is_empty());

        assert!(ctx.analyze_geographies(&provider, &["rosario"]).is_err());
    }
}
