#![allow(dead_code)]

use std::path::{Path, PathBuf};

use labor_indicators::models::{MonthlyInflationEntry, Period, SurveyRecord};
use labor_indicators::utils::io::{SurveyKind, raw_extract_path};

/// Header of the raw individual extracts used in tests
pub const EXTRACT_HEADER: &str = "CODUSU;ANO4;TRIMESTRE;AGLOMERADO;ESTADO;CH04;CH06;PONDERA;P47T";

/// A respondent with every raw field set
#[must_use]
pub fn respondent(period: Period, state: &str, age: &str, weight: &str) -> SurveyRecord {
    SurveyRecord::new(period)
        .with_labor_state(state)
        .with_age(age)
        .with_weight(weight)
}

/// Quarter shorthand
#[must_use]
pub fn q(year: i32, quarter: u32) -> Period {
    Period::new(year, quarter).expect("valid test period")
}

/// Constant monthly inflation from January of `year`
#[must_use]
pub fn flat_inflation(year: i32, months: u32, rate: f64) -> Vec<MonthlyInflationEntry> {
    (0..months)
        .map(|i| {
            let year = year + i32::try_from(i / 12).unwrap();
            MonthlyInflationEntry::new(year, i % 12 + 1, rate)
        })
        .collect()
}

/// Write a raw `;`-delimited individual extract and return its path
pub fn write_raw_extract(raw_dir: &Path, period: Period, rows: &[&str]) -> PathBuf {
    let path = raw_extract_path(raw_dir, SurveyKind::Individual, period);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();

    let mut content = String::from(EXTRACT_HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    std::fs::write(&path, content).unwrap();
    path
}
