//! Data models for survey records, reference series and indicator outputs

pub mod indicators;
pub mod inflation;
pub mod period;
pub mod record;

pub use indicators::{
    NominalIncomeRecord, PeriodKeyed, PriceIndexRecord, QuarterlyIncomeRecord,
    QuarterlyInflationRecord, QuarterlyRateRecord,
};
pub use inflation::{MonthlyInflationEntry, load_inflation_table};
pub use period::Period;
pub use record::{LaborState, Sex, Slice, SurveyRecord, Zone};
