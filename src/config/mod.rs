//! Configuration for an indicator analysis run.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use crate::algorithm::price_index::CompoundingPolicy;
use crate::error::{IndicatorError, Result};

/// First survey year covered by default
pub const DEFAULT_FIRST_YEAR: i32 = 2016;
/// Last survey year covered by default
pub const DEFAULT_LAST_YEAR: i32 = 2025;
/// Working-age threshold used by the survey
pub const DEFAULT_MIN_WORKING_AGE: f64 = 10.0;

/// Column names of the individual survey extract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyColumns {
    /// Survey year (four digits)
    pub year: String,
    /// Survey quarter (1-4)
    pub quarter: String,
    /// Labor state code (1 employed, 2 unemployed, 3 inactive)
    pub labor_state: String,
    /// Age in years
    pub age: String,
    /// Expansion weight
    pub weight: String,
    /// Sex code (1 male, 2 female)
    pub sex: String,
    /// Total individual income
    pub income: String,
    /// Geography (agglomeration) code
    pub geography: String,
}

impl Default for SurveyColumns {
    fn default() -> Self {
        Self {
            year: "ANO4".to_string(),
            quarter: "TRIMESTRE".to_string(),
            labor_state: "ESTADO".to_string(),
            age: "CH06".to_string(),
            weight: "PONDERA".to_string(),
            sex: "CH04".to_string(),
            income: "P47T".to_string(),
            geography: "AGLOMERADO".to_string(),
        }
    }
}

/// Configuration for an indicator analysis run
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// First survey year included in the analysis
    pub first_year: i32,
    /// Last survey year included in the analysis
    pub last_year: i32,
    /// Records younger than this are left out of rate computation
    pub min_working_age: f64,
    /// Geography name to survey agglomeration code
    pub geographies: BTreeMap<String, String>,
    /// Column layout of the survey extracts
    pub columns: SurveyColumns,
    /// Root of the parquet cache
    pub cache_dir: PathBuf,
    /// Root of the raw delimited extracts
    pub raw_dir: PathBuf,
    /// How monthly inflation is grouped into quarters
    pub compounding: CompoundingPolicy,
    /// Worker threads for per-geography fan-out (`None` uses the rayon default)
    pub threads: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let geographies = BTreeMap::from([
            ("gran_mendoza".to_string(), "10".to_string()),
            ("gba".to_string(), "33".to_string()),
        ]);

        Self {
            first_year: DEFAULT_FIRST_YEAR,
            last_year: DEFAULT_LAST_YEAR,
            min_working_age: DEFAULT_MIN_WORKING_AGE,
            geographies,
            columns: SurveyColumns::default(),
            cache_dir: PathBuf::from("periodos/parquet"),
            raw_dir: PathBuf::from("periodos/raw"),
            compounding: CompoundingPolicy::default(),
            threads: None,
        }
    }
}

impl AnalysisConfig {
    /// Years covered by the analysis
    #[must_use]
    pub fn years(&self) -> RangeInclusive<i32> {
        self.first_year..=self.last_year
    }

    /// Whether a year lies inside the analysis range
    #[must_use]
    pub fn contains_year(&self, year: i32) -> bool {
        self.years().contains(&year)
    }

    /// Survey code for a geography name
    pub fn geography_code(&self, geography: &str) -> Result<&str> {
        self.geographies
            .get(geography)
            .map(String::as_str)
            .ok_or_else(|| IndicatorError::UnknownGeography(geography.to_string()))
    }

    /// Number of worker threads to use for parallel slices
    #[must_use]
    pub fn worker_threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}

impl fmt::Display for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis Configuration:")?;
        writeln!(f, "  Years: {}-{}", self.first_year, self.last_year)?;
        writeln!(f, "  Minimum Working Age: {}", self.min_working_age)?;
        for (name, code) in &self.geographies {
            writeln!(f, "  Geography: {name} (code {code})")?;
        }
        writeln!(f, "  Cache Directory: {}", self.cache_dir.display())?;
        writeln!(f, "  Raw Directory: {}", self.raw_dir.display())?;
        writeln!(f, "  Compounding: {:?}", self.compounding)?;
        if let Some(threads) = self.threads {
            writeln!(f, "  Threads: {threads}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.years(), 2016..=2025);
        assert!(config.contains_year(2020));
        assert!(!config.contains_year(2015));
        assert_eq!(config.geography_code("gba").unwrap(), "33");
        assert_eq!(config.geography_code("gran_mendoza").unwrap(), "10");
        assert!(config.geography_code("rosario").is_err());
        assert_eq!(config.columns.weight, "PONDERA");
    }

    #[test]
    fn test_display_lists_geographies() {
        let rendered = AnalysisConfig::default().to_string();
        assert!(rendered.contains("Years: 2016-2025"));
        assert!(rendered.contains("gba (code 33)"));
    }
}
