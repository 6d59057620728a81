//! Per-field validation of raw survey values
//!
//! Each parser returns either the typed value or the [`Exclusion`] reason that
//! keeps the row out of an aggregate. Pipelines stay silent about exclusions by
//! default; the reasons are tallied in an [`ExclusionReport`] for callers that
//! want to inspect them.

use std::collections::BTreeMap;
use std::fmt;

use crate::models::record::LaborState;

/// Why a row was left out of an aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Exclusion {
    /// Labor state missing or not numeric
    UnparseableLaborState,
    /// Weight missing or not numeric
    UnparseableWeight,
    /// Age missing or not numeric
    UnparseableAge,
    /// Age below the working-age threshold
    BelowWorkingAge,
    /// Numeric labor state outside the known codes
    UnknownLaborState,
    /// Income missing or not numeric
    UnparseableIncome,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::UnparseableLaborState => "unparseable labor state",
            Self::UnparseableWeight => "unparseable weight",
            Self::UnparseableAge => "unparseable age",
            Self::BelowWorkingAge => "below working age",
            Self::UnknownLaborState => "unknown labor state",
            Self::UnparseableIncome => "unparseable income",
        };
        f.write_str(label)
    }
}

/// Coerce a raw value to a number
///
/// Surrounding whitespace is ignored. Empty, non-numeric and non-finite values
/// yield `None`.
#[must_use]
pub fn parse_numeric(raw: Option<&str>) -> Option<f64> {
    let value = raw?.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse the expansion weight
pub fn parse_weight(raw: Option<&str>) -> Result<f64, Exclusion> {
    parse_numeric(raw).ok_or(Exclusion::UnparseableWeight)
}

/// Parse the numeric labor state code without checking it is a known code
pub fn parse_labor_code(raw: Option<&str>) -> Result<f64, Exclusion> {
    parse_numeric(raw).ok_or(Exclusion::UnparseableLaborState)
}

/// Map a numeric labor state code to a known state
pub fn classify_labor_code(code: f64) -> Result<LaborState, Exclusion> {
    LaborState::from_code(code).ok_or(Exclusion::UnknownLaborState)
}

/// Parse an age and check it against the working-age threshold
pub fn parse_working_age(raw: Option<&str>, min_age: f64) -> Result<f64, Exclusion> {
    let age = parse_numeric(raw).ok_or(Exclusion::UnparseableAge)?;
    if age < min_age {
        return Err(Exclusion::BelowWorkingAge);
    }
    Ok(age)
}

/// Parse a reported income
pub fn parse_income(raw: Option<&str>) -> Result<f64, Exclusion> {
    parse_numeric(raw).ok_or(Exclusion::UnparseableIncome)
}

/// Tally of rows kept and rows excluded, by reason
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionReport {
    /// Rows that contributed to an aggregate
    pub accepted: usize,
    excluded: BTreeMap<Exclusion, usize>,
}

impl ExclusionReport {
    /// Create an empty report
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a row that contributed
    pub fn accept(&mut self) {
        self.accepted += 1;
    }

    /// Count a row excluded for a reason
    pub fn exclude(&mut self, reason: Exclusion) {
        *self.excluded.entry(reason).or_insert(0) += 1;
    }

    /// Rows excluded for a reason
    #[must_use]
    pub fn count(&self, reason: Exclusion) -> usize {
        self.excluded.get(&reason).copied().unwrap_or(0)
    }

    /// Rows excluded for any reason
    #[must_use]
    pub fn total_excluded(&self) -> usize {
        self.excluded.values().sum()
    }

    /// Rows seen in total
    #[must_use]
    pub fn total(&self) -> usize {
        self.accepted + self.total_excluded()
    }

    /// Exclusion counts ordered by reason
    pub fn reasons(&self) -> impl Iterator<Item = (Exclusion, usize)> + '_ {
        self.excluded.iter().map(|(&reason, &count)| (reason, count))
    }
}

impl fmt::Display for ExclusionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} accepted, {} excluded",
            self.accepted,
            self.total_excluded()
        )?;
        for (reason, count) in self.reasons() {
            write!(f, "; {reason}: {count}")?;
        }
        Ok(())
    }
}
