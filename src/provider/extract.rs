//! Conversion of survey record batches into [`SurveyRecord`]s

use arrow::compute::concat_batches;
use arrow::record_batch::RecordBatch;
use log::debug;

use crate::algorithm::zone::{ZoneSelector, resolve_zone_column, zone_values};
use crate::config::SurveyColumns;
use crate::error::{IndicatorError, Result};
use crate::models::{Period, SurveyRecord};
use crate::utils::arrow::extract_strings;
use crate::validation::parse_numeric;

/// Parse a whole-number survey value (e.g. "2020" or "2020.0")
fn parse_whole(raw: Option<&str>) -> Option<i64> {
    let value = parse_numeric(raw)?;
    if value.fract() != 0.0 {
        return None;
    }
    // whole and finite, so the cast is exact for survey-sized values
    Some(value as i64)
}

fn row_period(year: Option<&str>, quarter: Option<&str>) -> Option<Period> {
    let year = i32::try_from(parse_whole(year)?).ok()?;
    let quarter = u32::try_from(parse_whole(quarter)?).ok()?;
    Period::new(year, quarter).ok()
}

/// Build survey records from one batch of an individual extract
///
/// The period of each row comes from the year and quarter columns. When those
/// columns are absent, `fallback_period` is used for every row; without either
/// the call fails. Rows whose period does not parse are dropped. Missing value
/// columns leave the field empty, so the pipelines exclude those rows later.
///
/// With a zone selector, every row also gets a normalized zone; zone failures
/// are fatal for the batch.
pub fn records_from_batch(
    batch: &RecordBatch,
    columns: &SurveyColumns,
    fallback_period: Option<Period>,
    zone: Option<&ZoneSelector>,
) -> Result<Vec<SurveyRecord>> {
    let rows = batch.num_rows();

    let years = extract_strings(batch, &columns.year, false)?;
    let quarters = extract_strings(batch, &columns.quarter, false)?;
    if (years.is_none() || quarters.is_none()) && fallback_period.is_none() {
        let missing = if years.is_none() {
            &columns.year
        } else {
            &columns.quarter
        };
        return Err(IndicatorError::ColumnNotFound {
            column: missing.clone(),
        });
    }

    let column = |name: &str| -> Result<Vec<Option<String>>> {
        Ok(extract_strings(batch, name, false)?.unwrap_or_else(|| vec![None; rows]))
    };
    let mut labor_states = column(&columns.labor_state)?.into_iter();
    let mut ages = column(&columns.age)?.into_iter();
    let mut weights = column(&columns.weight)?.into_iter();
    let mut sexes = column(&columns.sex)?.into_iter();
    let mut incomes = column(&columns.income)?.into_iter();

    let zones = match zone {
        Some(selector) => Some(zone_values(batch, selector)?),
        None => None,
    };

    let mut records = Vec::with_capacity(rows);
    let mut dropped = 0usize;

    for row in 0..rows {
        let (labor_state, age, weight, sex, income) = (
            labor_states.next().flatten(),
            ages.next().flatten(),
            weights.next().flatten(),
            sexes.next().flatten(),
            incomes.next().flatten(),
        );

        let period = match (&years, &quarters) {
            (Some(y), Some(q)) => row_period(y[row].as_deref(), q[row].as_deref()),
            _ => fallback_period,
        };
        let Some(period) = period else {
            dropped += 1;
            continue;
        };

        records.push(SurveyRecord {
            period,
            labor_state,
            age,
            weight,
            sex,
            income,
            zone: zones.as_ref().map(|z| z[row]),
        });
    }

    if dropped > 0 {
        debug!("Dropped {dropped} of {rows} rows with an unparseable period");
    }

    Ok(records)
}

/// Build survey records from every batch of one extract
///
/// A [`ZoneSelector::Detect`] selector is resolved once over all batches
/// together, so every row of the extract takes its zone from the same column.
pub fn records_from_batches(
    batches: &[RecordBatch],
    columns: &SurveyColumns,
    fallback_period: Option<Period>,
    zone: Option<&ZoneSelector>,
) -> Result<Vec<SurveyRecord>> {
    let resolved = match (zone, batches.first()) {
        (Some(ZoneSelector::Detect), Some(first)) => {
            let combined = concat_batches(&first.schema(), batches)?;
            let column = resolve_zone_column(&combined, &ZoneSelector::Detect)?;
            Some(ZoneSelector::Column(column))
        }
        _ => zone.cloned(),
    };

    let mut records = Vec::new();
    for batch in batches {
        records.extend(records_from_batch(
            batch,
            columns,
            fallback_period,
            resolved.as_ref(),
        )?);
    }
    Ok(records)
}
