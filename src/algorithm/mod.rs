//! Indicator pipelines
//!
//! Every pipeline is a pure function over borrowed inputs. Row-level problems
//! exclude the row and period-level gaps omit the period; only zone resolution
//! and calendar compounding can fail a whole call.

pub mod comparison;
pub mod income;
pub mod price_index;
pub mod rates;
pub mod zone;

pub use comparison::{ComparisonRow, Indicator, IndicatorSeries, compare_series, latest_value};
pub use income::{compute_nominal_income, compute_nominal_income_with_report, compute_real_income};
pub use price_index::{
    CompoundingPolicy, compute_quarterly_index, compute_quarterly_index_with,
    compute_quarterly_rates, validate_month_contiguity,
};
pub use rates::{LaborTotals, compute_rates, compute_rates_with_report};
pub use zone::{ZoneSelector, classify_zone_column, normalize_zone_values, zone_values};
