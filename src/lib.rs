//! Labor-market and income indicators from household-survey microdata.
//!
//! Quarterly activity, employment and unemployment rates, weighted mean income,
//! and income deflated by a cumulative price index built from monthly inflation.
//! Survey extracts are read from a per-geography parquet cache.

pub mod algorithm;
pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod models;
pub mod provider;
pub mod utils;
pub mod validation;

// Core types
pub use config::{AnalysisConfig, SurveyColumns};
pub use context::{AnalysisContext, GeographyIndicators, SliceIndicators};
pub use error::{IndicatorError, Result};

// Pipelines
pub use algorithm::{
    CompoundingPolicy, ComparisonRow, Indicator, ZoneSelector, compare_series,
    compute_nominal_income, compute_quarterly_index, compute_rates, compute_real_income,
    latest_value,
};

// Models
pub use models::{
    MonthlyInflationEntry, NominalIncomeRecord, Period, PriceIndexRecord, QuarterlyIncomeRecord,
    QuarterlyRateRecord, Slice, SurveyRecord,
};

// Providers
pub use provider::{InMemoryProvider, ParquetCacheProvider, RecordProvider, collect_records};

pub use validation::{Exclusion, ExclusionReport};
