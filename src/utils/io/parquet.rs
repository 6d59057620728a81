//! Parquet file operations
//!
//! Reading and writing of the survey cache and exported series.

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use parquet::arrow::ArrowWriter;
use parquet::arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder};

use crate::error::{IndicatorError, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Default batch size for Parquet reading
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Batch size from the `EPH_BATCH_SIZE` environment variable, if set
#[must_use]
pub fn get_batch_size() -> Option<usize> {
    std::env::var("EPH_BATCH_SIZE")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&n| n > 0)
}

/// Read a parquet file into record batches
///
/// When `columns` is given, only the columns present in the file are read;
/// names missing from the file are logged and skipped.
pub fn read_parquet(path: &Path, columns: Option<&[&str]>) -> Result<Vec<RecordBatch>> {
    let start = Instant::now();
    log_operation_start("Reading parquet file", path);

    if !path.is_file() {
        return Err(IndicatorError::PathNotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let mut builder = ParquetRecordBatchReaderBuilder::try_new(file)?
        .with_batch_size(get_batch_size().unwrap_or(DEFAULT_BATCH_SIZE));

    if let Some(columns) = columns {
        let file_schema = builder.schema().clone();
        let projection = columns
            .iter()
            .filter_map(|name| match file_schema.index_of(name) {
                Ok(idx) => Some(idx),
                Err(_) => {
                    log_warning(&format!("Column {name} not found in parquet file"), Some(path));
                    None
                }
            })
            .sorted()
            .collect_vec();

        if !projection.is_empty() {
            let mask = ProjectionMask::roots(builder.parquet_schema(), projection);
            builder = builder.with_projection(mask);
        }
    }

    let batches = builder.build()?.collect::<std::result::Result<Vec<_>, _>>()?;

    log_operation_complete(
        "read",
        path,
        batches.iter().map(RecordBatch::num_rows).sum(),
        Some(start.elapsed()),
    );
    Ok(batches)
}

/// Write record batches to a parquet file, creating parent directories
pub fn write_parquet(path: &Path, schema: SchemaRef, batches: &[RecordBatch]) -> Result<()> {
    let start = Instant::now();
    log_operation_start("Writing parquet file", path);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    for batch in batches {
        writer.write(batch)?;
    }
    writer.close()?;

    log_operation_complete(
        "wrote",
        path,
        batches.iter().map(RecordBatch::num_rows).sum(),
        Some(start.elapsed()),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, StringArray};
    use std::sync::Arc;

    #[test]
    fn test_round_trip_with_projection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.parquet");

        let batch = RecordBatch::try_from_iter(vec![
            ("A", Arc::new(StringArray::from(vec!["1", "2"])) as ArrayRef),
            ("B", Arc::new(StringArray::from(vec!["x", "y"])) as ArrayRef),
        ])
        .unwrap();

        write_parquet(&path, batch.schema(), &[batch]).unwrap();

        let all = read_parquet(&path, None).unwrap();
        assert_eq!(all.iter().map(RecordBatch::num_rows).sum::<usize>(), 2);
        assert_eq!(all[0].num_columns(), 2);

        let projected = read_parquet(&path, Some(&["B", "MISSING"])).unwrap();
        assert_eq!(projected[0].num_columns(), 1);
        assert_eq!(projected[0].schema().field(0).name(), "B");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_parquet(&dir.path().join("none.parquet"), None),
            Err(IndicatorError::PathNotFound(_))
        ));
    }
}
