//! Survey periods
//!
//! A period is a (year, quarter) pair. It is the join key between survey
//! aggregates and the quarterly price index.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};

/// One quarterly observation window
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Calendar year
    pub year: i32,
    /// Quarter of the year (1-4)
    pub quarter: u32,
}

impl Period {
    /// Create a period, rejecting quarters outside 1-4
    pub fn new(year: i32, quarter: u32) -> Result<Self> {
        if !(1..=4).contains(&quarter) {
            return Err(IndicatorError::InvalidPeriod(format!(
                "quarter {quarter} of {year} is outside 1-4"
            )));
        }
        Ok(Self { year, quarter })
    }

    /// Calendar quarter containing the given month
    pub fn from_month(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(IndicatorError::InvalidPeriod(format!(
                "month {month} of {year} is outside 1-12"
            )));
        }
        Ok(Self {
            year,
            quarter: (month - 1) / 3 + 1,
        })
    }

    /// The quarter after this one
    #[must_use]
    pub fn next(&self) -> Self {
        if self.quarter >= 4 {
            Self {
                year: self.year + 1,
                quarter: 1,
            }
        } else {
            Self {
                year: self.year,
                quarter: self.quarter + 1,
            }
        }
    }

    /// All quarters of the given years, in order
    pub fn quarters_of(years: impl IntoIterator<Item = i32>) -> impl Iterator<Item = Self> {
        years
            .into_iter()
            .flat_map(|year| (1..=4).map(move |quarter| Self { year, quarter }))
    }

    /// Two-digit year suffix used in survey file names (2016 -> 16)
    #[must_use]
    pub fn short_year(&self) -> i32 {
        self.year.rem_euclid(100)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-Q{}", self.year, self.quarter)
    }
}
