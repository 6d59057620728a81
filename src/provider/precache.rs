//! Build the parquet cache from raw survey extracts
//!
//! Raw extracts are `;`-delimited latin-1 text covering every agglomeration.
//! Each one is decoded, read with an all-text schema, filtered to the rows of
//! one geography and written under `{cache_dir}/{geography}/{kind}/`.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use arrow::array::BooleanArray;
use arrow::compute::filter_record_batch;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use encoding_rs::WINDOWS_1252;
use log::{info, warn};

use crate::config::AnalysisConfig;
use crate::error::{IndicatorError, Result};
use crate::models::Period;
use crate::utils::arrow::extract_strings;
use crate::utils::io::{
    DEFAULT_BATCH_SIZE, SurveyKind, cache_path, get_batch_size, raw_extract_path, write_parquet,
};
use crate::utils::logging::{create_period_progress_bar, finish_progress_bar, log_warning};
use crate::validation::parse_numeric;

const DELIMITER: u8 = b';';

/// Outcome of a precache run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrecacheSummary {
    /// Parquet files written
    pub written: usize,
    /// Raw extracts that were not found
    pub missing: usize,
    /// Rows kept across all written files
    pub rows: usize,
}

/// Decode latin-1 bytes to text
///
/// Windows-1252 is a superset of latin-1 for every printable byte the
/// extracts use, so the decode never fails.
#[must_use]
pub fn decode_latin1(bytes: &[u8]) -> String {
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}

/// All-text schema built from the header line of a delimited extract
pub fn header_schema(text: &str) -> Result<SchemaRef> {
    let header = text
        .lines()
        .next()
        .filter(|line| !line.trim().is_empty())
        .ok_or_else(|| IndicatorError::MalformedExtract("missing header line".to_string()))?;

    let fields: Vec<Field> = header
        .split(DELIMITER as char)
        .map(|name| Field::new(name.trim().trim_matches('"'), DataType::Utf8, true))
        .collect();

    Ok(Arc::new(Schema::new(fields)))
}

/// Read a decoded extract into record batches of text columns
pub fn read_delimited(text: &str) -> Result<(SchemaRef, Vec<RecordBatch>)> {
    let schema = header_schema(text)?;
    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_header(true)
        .with_delimiter(DELIMITER)
        .with_batch_size(get_batch_size().unwrap_or(DEFAULT_BATCH_SIZE))
        .build(Cursor::new(text.as_bytes()))?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((schema, batches))
}

/// Keep the rows of a batch whose geography column equals `code`
///
/// Codes are compared numerically, so "033" and "33" match.
pub fn filter_geography(batch: &RecordBatch, column: &str, code: &str) -> Result<RecordBatch> {
    let target = parse_numeric(Some(code));
    let values = extract_strings(batch, column, true)?.unwrap_or_default();

    let mask: BooleanArray = values
        .iter()
        .map(|v| Some(target.is_some() && parse_numeric(v.as_deref()) == target))
        .collect();

    Ok(filter_record_batch(batch, &mask)?)
}

/// Cache one raw extract for one geography
///
/// Returns the number of rows written, or `None` when the raw file is missing.
pub fn precache_extract(
    raw_path: &Path,
    target: &Path,
    geography_column: &str,
    code: &str,
) -> Result<Option<usize>> {
    if !raw_path.is_file() {
        log_warning("Raw extract not found, skipping", Some(raw_path));
        return Ok(None);
    }

    let text = decode_latin1(&std::fs::read(raw_path)?);
    let (schema, batches) = read_delimited(&text)?;

    let filtered = batches
        .iter()
        .map(|b| filter_geography(b, geography_column, code))
        .collect::<Result<Vec<_>>>()?;
    let rows = filtered.iter().map(RecordBatch::num_rows).sum();

    write_parquet(target, schema, &filtered)?;
    Ok(Some(rows))
}

/// Cache every period of the configured years for a geography, both kinds
pub fn precache_geography(config: &AnalysisConfig, geography: &str) -> Result<PrecacheSummary> {
    let code = config.geography_code(geography)?;
    let periods: Vec<Period> = Period::quarters_of(config.years()).collect();
    let pb = create_period_progress_bar(periods.len() as u64, Some(geography));

    let mut summary = PrecacheSummary::default();
    for period in periods {
        for kind in SurveyKind::ALL {
            let raw = raw_extract_path(&config.raw_dir, kind, period);
            let target = cache_path(&config.cache_dir, geography, kind, period);

            match precache_extract(&raw, &target, &config.columns.geography, code)? {
                Some(rows) => {
                    summary.written += 1;
                    summary.rows += rows;
                }
                None => summary.missing += 1,
            }
        }
        pb.inc(1);
    }
    finish_progress_bar(&pb, Some("cached"));

    if summary.written == 0 {
        warn!("No raw extracts found for {geography} under {}", config.raw_dir.display());
    }
    info!(
        "Precached {geography}: {} files, {} rows, {} missing extracts",
        summary.written, summary.rows, summary.missing
    );
    Ok(summary)
}
