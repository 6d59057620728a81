//! Text extraction from Arrow record batches
//!
//! Survey extracts are ingested as text, but a cached batch may carry numeric
//! columns. These helpers render any column to optional strings so the
//! validation layer sees the same input whatever the storage type.

use arrow::array::{Array, ArrayRef, LargeStringArray, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use log::warn;

use crate::error::{IndicatorError, Result};

/// Render every value of an array as text, keeping nulls as `None`
///
/// # Errors
///
/// Returns an error if the array type cannot be formatted.
pub fn column_strings(array: &ArrayRef) -> Result<Vec<Option<String>>> {
    match array.data_type() {
        DataType::Utf8 => {
            let strings = downcast::<StringArray>(array)?;
            Ok(strings.iter().map(|v| v.map(str::to_string)).collect())
        }
        DataType::LargeUtf8 => {
            let strings = downcast::<LargeStringArray>(array)?;
            Ok(strings.iter().map(|v| v.map(str::to_string)).collect())
        }
        _ => {
            let formatter = ArrayFormatter::try_new(array.as_ref(), &FormatOptions::default())?;
            Ok((0..array.len())
                .map(|i| {
                    if array.is_null(i) {
                        None
                    } else {
                        Some(formatter.value(i).to_string())
                    }
                })
                .collect())
        }
    }
}

/// Text values of a named column
///
/// # Returns
///
/// * `Ok(Some(values))` - The rendered column
/// * `Ok(None)` - The column is absent and not required
/// * `Err` - The column is absent and required, or cannot be rendered
pub fn extract_strings(
    batch: &RecordBatch,
    column_name: &str,
    required: bool,
) -> Result<Option<Vec<Option<String>>>> {
    let Ok(idx) = batch.schema().index_of(column_name) else {
        if required {
            return Err(IndicatorError::ColumnNotFound {
                column: column_name.to_string(),
            });
        }
        warn!("Column '{column_name}' not found in record batch");
        return Ok(None);
    };

    column_strings(batch.column(idx)).map(Some)
}

fn downcast<T: 'static>(array: &ArrayRef) -> Result<&T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        IndicatorError::Arrow(arrow::error::ArrowError::CastError(format!(
            "unexpected array type {}",
            array.data_type()
        )))
    })
}
