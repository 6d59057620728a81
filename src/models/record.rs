//! Survey record model
//!
//! One respondent-quarter observation from the individual survey extract. Raw
//! fields are kept as text, the way the extracts are ingested; numeric coercion
//! happens in [`crate::validation`] when a pipeline needs the value.

use serde::{Deserialize, Serialize};

use crate::models::period::Period;
use crate::validation::parse_numeric;

/// Labor-force state of a respondent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LaborState {
    /// Working (code 1)
    Employed,
    /// Looking for work (code 2)
    Unemployed,
    /// Outside the labor force (code 3)
    Inactive,
}

impl LaborState {
    /// Map a numeric survey code to a state
    #[must_use]
    pub fn from_code(code: f64) -> Option<Self> {
        match code {
            c if c == 1.0 => Some(Self::Employed),
            c if c == 2.0 => Some(Self::Unemployed),
            c if c == 3.0 => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Sex of a respondent, used only for slicing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// Code 1
    Male,
    /// Code 2
    Female,
}

impl Sex {
    /// Both sexes, in survey code order
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];

    /// Map a raw survey value to a sex
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Option<Self> {
        match parse_numeric(raw) {
            Some(c) if c == 1.0 => Some(Self::Male),
            Some(c) if c == 2.0 => Some(Self::Female),
            _ => None,
        }
    }

    /// Lower-case label used in series names
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

/// Urban or rural zone of a respondent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Code 1
    Urban,
    /// Code 2
    Rural,
}

impl Zone {
    /// Both zones, in survey code order
    pub const ALL: [Self; 2] = [Self::Urban, Self::Rural];

    /// Lower-case label used in series names
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Urban => "urban",
            Self::Rural => "rural",
        }
    }
}

/// One respondent in one quarter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyRecord {
    /// Survey period of the observation
    pub period: Period,
    /// Raw labor state code
    pub labor_state: Option<String>,
    /// Raw age
    pub age: Option<String>,
    /// Raw expansion weight
    pub weight: Option<String>,
    /// Raw sex code
    pub sex: Option<String>,
    /// Raw total individual income
    pub income: Option<String>,
    /// Normalized zone, when the extract carried one
    pub zone: Option<Zone>,
}

impl SurveyRecord {
    /// Create an empty record for a period
    #[must_use]
    pub fn new(period: Period) -> Self {
        Self {
            period,
            labor_state: None,
            age: None,
            weight: None,
            sex: None,
            income: None,
            zone: None,
        }
    }

    /// Set the raw labor state code
    #[must_use]
    pub fn with_labor_state(mut self, value: impl Into<String>) -> Self {
        self.labor_state = Some(value.into());
        self
    }

    /// Set the raw age
    #[must_use]
    pub fn with_age(mut self, value: impl Into<String>) -> Self {
        self.age = Some(value.into());
        self
    }

    /// Set the raw expansion weight
    #[must_use]
    pub fn with_weight(mut self, value: impl Into<String>) -> Self {
        self.weight = Some(value.into());
        self
    }

    /// Set the raw sex code
    #[must_use]
    pub fn with_sex(mut self, value: impl Into<String>) -> Self {
        self.sex = Some(value.into());
        self
    }

    /// Set the raw income
    #[must_use]
    pub fn with_income(mut self, value: impl Into<String>) -> Self {
        self.income = Some(value.into());
        self
    }

    /// Set the normalized zone
    #[must_use]
    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = Some(zone);
        self
    }

    /// Sex of the respondent, if the raw code is valid
    #[must_use]
    pub fn sex(&self) -> Option<Sex> {
        Sex::from_raw(self.sex.as_deref())
    }
}

/// A subset of records selected for one series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slice {
    /// Every record
    All,
    /// Records of one sex
    Sex(Sex),
    /// Records of one zone
    Zone(Zone),
}

impl Slice {
    /// Whether a record belongs to this slice
    #[must_use]
    pub fn contains(&self, record: &SurveyRecord) -> bool {
        match self {
            Self::All => true,
            Self::Sex(sex) => record.sex() == Some(*sex),
            Self::Zone(zone) => record.zone == Some(*zone),
        }
    }

    /// Records of this slice
    #[must_use]
    pub fn select<'a>(&self, records: &'a [SurveyRecord]) -> Vec<&'a SurveyRecord> {
        records.iter().filter(|r| self.contains(r)).collect()
    }

    /// Label used in series names
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Sex(sex) => sex.label(),
            Self::Zone(zone) => zone.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period() -> Period {
        Period::new(2020, 1).unwrap()
    }

    #[test]
    fn test_labor_state_codes() {
        assert_eq!(LaborState::from_code(1.0), Some(LaborState::Employed));
        assert_eq!(LaborState::from_code(2.0), Some(LaborState::Unemployed));
        assert_eq!(LaborState::from_code(3.0), Some(LaborState::Inactive));
        assert_eq!(LaborState::from_code(4.0), None);
        assert_eq!(LaborState::from_code(0.0), None);
    }

    #[test]
    fn test_sex_parsing() {
        assert_eq!(Sex::from_raw(Some("1")), Some(Sex::Male));
        assert_eq!(Sex::from_raw(Some(" 2 ")), Some(Sex::Female));
        assert_eq!(Sex::from_raw(Some("2.0")), Some(Sex::Female));
        assert_eq!(Sex::from_raw(Some("x")), None);
        assert_eq!(Sex::from_raw(None), None);
    }

    #[test]
    fn test_slices() {
        let records = vec![
            SurveyRecord::new(period()).with_sex("1").with_zone(Zone::Urban),
            SurveyRecord::new(period()).with_sex("2").with_zone(Zone::Rural),
            SurveyRecord::new(period()).with_sex("2"),
        ];

        assert_eq!(Slice::All.select(&records).len(), 3);
        assert_eq!(Slice::Sex(Sex::Female).select(&records).len(), 2);
        assert_eq!(Slice::Sex(Sex::Male).select(&records).len(), 1);
        assert_eq!(Slice::Zone(Zone::Rural).select(&records).len(), 1);
        assert_eq!(Slice::Zone(Zone::Urban).label(), "urban");
    }
}
