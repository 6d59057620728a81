//! Survey file layout
//!
//! Raw extracts live at `{raw}/{kind}/usu_{kind}_T{q}{yy}.txt` and the cache at
//! `{cache}/{geography}/{kind}/usu_{kind}_T{q}{yy}.parquet`.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::models::Period;

/// Survey table kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurveyKind {
    /// One row per household
    Household,
    /// One row per respondent
    Individual,
}

impl SurveyKind {
    /// Directory and file-name component of the kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Household => "hogar",
            Self::Individual => "individual",
        }
    }

    /// Both kinds, in precache order
    pub const ALL: [Self; 2] = [Self::Household, Self::Individual];
}

impl fmt::Display for SurveyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File stem of a survey table for a period, e.g. `usu_individual_T120`
#[must_use]
pub fn survey_file_stem(kind: SurveyKind, period: Period) -> String {
    format!(
        "usu_{}_T{}{:02}",
        kind.as_str(),
        period.quarter,
        period.short_year()
    )
}

/// Path of a raw delimited extract
#[must_use]
pub fn raw_extract_path(raw_dir: &Path, kind: SurveyKind, period: Period) -> PathBuf {
    raw_dir
        .join(kind.as_str())
        .join(format!("{}.txt", survey_file_stem(kind, period)))
}

/// Path of a cached parquet file
#[must_use]
pub fn cache_path(cache_dir: &Path, geography: &str, kind: SurveyKind, period: Period) -> PathBuf {
    cache_dir
        .join(geography)
        .join(kind.as_str())
        .join(format!("{}.parquet", survey_file_stem(kind, period)))
}
