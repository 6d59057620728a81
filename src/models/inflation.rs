//! Monthly inflation reference table

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// One month of consumer-price inflation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyInflationEntry {
    /// Calendar year
    pub year: i32,
    /// Calendar month (1-12)
    pub month: u32,
    /// Month-over-month inflation in percent
    #[serde(alias = "ipc")]
    pub rate: f64,
}

impl MonthlyInflationEntry {
    /// Create an entry
    #[must_use]
    pub const fn new(year: i32, month: u32, rate: f64) -> Self {
        Self { year, month, rate }
    }

    /// Growth factor of the month (`1 + rate / 100`)
    #[must_use]
    pub fn factor(&self) -> f64 {
        1.0 + self.rate / 100.0
    }

    /// Months since year 0, used to check contiguity
    #[must_use]
    pub fn month_index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }
}

/// Load a monthly inflation table from a JSON array
///
/// Entries are `{"year": 2017, "month": 1, "rate": 1.6}`; the field `ipc`
/// is accepted as an alias of `rate`.
pub fn load_inflation_table(path: &Path) -> Result<Vec<MonthlyInflationEntry>> {
    let start = std::time::Instant::now();
    log_operation_start("Reading inflation table", path);

    if !path.is_file() {
        return Err(IndicatorError::PathNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let entries: Vec<MonthlyInflationEntry> = serde_json::from_str(&content)?;

    log_operation_complete("read", path, entries.len(), Some(start.elapsed()));
    Ok(entries)
}
