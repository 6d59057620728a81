//! Urban/rural zone detection and normalization
//!
//! Survey extracts encode the zone either as numeric codes (1 urban, 2 rural)
//! or as Spanish labels. Callers should name the column through
//! [`ZoneSelector::Column`]; [`ZoneSelector::Detect`] falls back to scanning
//! the columns for one whose values look like a zone.

use arrow::record_batch::RecordBatch;
use log::{debug, info};
use rustc_hash::FxHashSet;

use crate::error::{IndicatorError, Result};
use crate::models::Zone;
use crate::utils::arrow::column_strings;

/// Values a numeric zone column may hold
const NUMERIC_ZONE_VALUES: [&str; 4] = ["1", "2", "1.0", "2.0"];
/// Labels that mark a textual zone column
const ZONE_LABELS: [&str; 4] = ["urbano", "rural", "urb", "rur"];

/// Where the zone of each record comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneSelector {
    /// A named column
    Column(String),
    /// The first column that looks like a zone indicator
    Detect,
}

/// Whether a set of distinct, lower-cased values looks like a zone column
///
/// The empty set is a subset of the numeric codes, so a column without any
/// non-null value qualifies.
#[must_use]
pub fn is_zone_value_set(values: &FxHashSet<String>) -> bool {
    values.iter().all(|v| NUMERIC_ZONE_VALUES.contains(&v.as_str()))
        || values.iter().any(|v| ZONE_LABELS.contains(&v.as_str()))
}

/// Map one raw value to a zone
#[must_use]
pub fn normalize_zone_value(raw: &str) -> Option<Zone> {
    match raw.trim().to_lowercase().as_str() {
        "urbano" | "urb" | "1" | "1.0" => Some(Zone::Urban),
        "rural" | "rur" | "2" | "2.0" => Some(Zone::Rural),
        _ => None,
    }
}

/// Find the first column that looks like a zone indicator
///
/// Columns are scanned in schema order. Columns whose type cannot be rendered
/// as text never qualify.
#[must_use]
pub fn classify_zone_column(batch: &RecordBatch) -> Option<String> {
    let schema = batch.schema();

    for (field, array) in schema.fields().iter().zip(batch.columns()) {
        let values = match column_strings(array) {
            Ok(values) => values,
            Err(e) => {
                debug!("Skipping column '{}' in zone detection: {e}", field.name());
                continue;
            }
        };

        let distinct: FxHashSet<String> = values
            .into_iter()
            .flatten()
            .map(|v| v.trim().to_lowercase())
            .collect();

        if is_zone_value_set(&distinct) {
            info!("Detected zone column '{}'", field.name());
            return Some(field.name().clone());
        }
    }

    None
}

/// Resolve a selector to a column name present in the batch
pub fn resolve_zone_column(batch: &RecordBatch, selector: &ZoneSelector) -> Result<String> {
    match selector {
        ZoneSelector::Column(name) => {
            batch
                .schema()
                .index_of(name)
                .map_err(|_| IndicatorError::ColumnNotFound {
                    column: name.clone(),
                })?;
            Ok(name.clone())
        }
        ZoneSelector::Detect => {
            classify_zone_column(batch).ok_or(IndicatorError::ZoneColumnNotFound {
                candidates: batch.num_columns(),
            })
        }
    }
}

/// Normalize every value of a zone column
///
/// Any value that is neither an urban nor a rural code, nulls included,
/// fails the whole call.
pub fn normalize_zone_values(batch: &RecordBatch, column: &str) -> Result<Vec<Zone>> {
    let idx = batch
        .schema()
        .index_of(column)
        .map_err(|_| IndicatorError::ColumnNotFound {
            column: column.to_string(),
        })?;

    column_strings(batch.column(idx))?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value
                .as_deref()
                .and_then(normalize_zone_value)
                .ok_or_else(|| IndicatorError::UnclassifiableZone {
                    column: column.to_string(),
                    row,
                    value,
                })
        })
        .collect()
}

/// Zones of every row, resolved through a selector
pub fn zone_values(batch: &RecordBatch, selector: &ZoneSelector) -> Result<Vec<Zone>> {
    let column = resolve_zone_column(batch, selector)?;
    normalize_zone_values(batch, &column)
}
