//! Output series rows
//!
//! Every row is flat (year and quarter as plain columns) so a series converts
//! directly to an Arrow record batch.

use serde::{Deserialize, Serialize};

use crate::models::period::Period;

/// Rows that are keyed by a survey period
pub trait PeriodKeyed {
    /// Period of the row
    fn period(&self) -> Period;
}

macro_rules! impl_period_keyed {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PeriodKeyed for $ty {
                fn period(&self) -> Period {
                    Period {
                        year: self.year,
                        quarter: self.quarter,
                    }
                }
            }
        )*
    };
}

/// Labor-market rates of one period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyRateRecord {
    pub year: i32,
    pub quarter: u32,
    /// Labor force over working-age population, in percent
    pub activity_pct: f64,
    /// Employed over working-age population, in percent
    pub employment_pct: f64,
    /// Unemployed over labor force, in percent
    pub unemployment_pct: f64,
}

/// Weighted mean reported income of one period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NominalIncomeRecord {
    pub year: i32,
    pub quarter: u32,
    pub mean_nominal_income: f64,
}

/// Cumulative price index of one quarter relative to the anchor quarter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceIndexRecord {
    pub year: i32,
    pub quarter: u32,
    pub cumulative_index: f64,
}

/// Compounded inflation of one quarter, before anchoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyInflationRecord {
    pub year: i32,
    pub quarter: u32,
    /// Quarterly rate as a fraction (0.0612 for 6.12%)
    pub rate: f64,
}

/// Nominal and inflation-adjusted income of one period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyIncomeRecord {
    pub year: i32,
    pub quarter: u32,
    pub mean_nominal_income: f64,
    pub cumulative_index: f64,
    pub mean_real_income: f64,
}

impl_period_keyed!(
    QuarterlyRateRecord,
    NominalIncomeRecord,
    PriceIndexRecord,
    QuarterlyInflationRecord,
    QuarterlyIncomeRecord,
);
