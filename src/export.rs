//! Export of output series to parquet and JSON
//!
//! Series rows are flat serde structs, so the Arrow schema is traced from the
//! row type with `serde_arrow` and the same code serves every series.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use arrow::datatypes::FieldRef;
use arrow::record_batch::RecordBatch;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_arrow::schema::{SchemaLike, TracingOptions};

use crate::error::Result;
use crate::utils::io::{read_parquet, write_parquet};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Convert a series into a single record batch
pub fn series_to_record_batch<T>(rows: &[T]) -> Result<RecordBatch>
where
    T: Serialize + DeserializeOwned,
{
    let fields = Vec::<FieldRef>::from_type::<T>(TracingOptions::default())?;
    Ok(serde_arrow::to_record_batch(&fields, &rows)?)
}

/// Write a series to a parquet file
pub fn write_series_parquet<T>(path: &Path, rows: &[T]) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    let batch = series_to_record_batch(rows)?;
    write_parquet(path, batch.schema(), &[batch])
}

/// Read a series back from a parquet file
pub fn read_series_parquet<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut rows = Vec::new();
    for batch in read_parquet(path, None)? {
        rows.extend(serde_arrow::from_record_batch::<Vec<T>>(&batch)?);
    }
    Ok(rows)
}

/// Write a series as a pretty-printed JSON array
pub fn write_series_json<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    log_operation_start("Writing JSON series", path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, rows)?;
    log_operation_complete("wrote", path, rows.len(), None);
    Ok(())
}

/// Read a series from a JSON array
pub fn read_series_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::ComparisonRow;
    use crate::models::{QuarterlyIncomeRecord, QuarterlyRateRecord};
    use arrow::datatypes::DataType;

    fn rates() -> Vec<QuarterlyRateRecord> {
        vec![
            QuarterlyRateRecord {
                year: 2020,
                quarter: 1,
                activity_pct: 75.0,
                employment_pct: 50.0,
                unemployment_pct: 100.0 / 3.0,
            },
            QuarterlyRateRecord {
                year: 2020,
                quarter: 2,
                activity_pct: 60.0,
                employment_pct: 55.0,
                unemployment_pct: 8.0,
            },
        ]
    }

    #[test]
    fn test_batch_schema_follows_row_type() {
        let batch = series_to_record_batch(&rates()).unwrap();
        assert_eq!(batch.num_rows(), 2);

        let schema = batch.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(
            names,
            vec!["year", "quarter", "activity_pct", "employment_pct", "unemployment_pct"]
        );
        assert_eq!(schema.field(0).data_type(), &DataType::Int32);
        assert_eq!(schema.field(2).data_type(), &DataType::Float64);

        let empty = series_to_record_batch::<QuarterlyIncomeRecord>(&[]).unwrap();
        assert_eq!(empty.num_rows(), 0);
        assert_eq!(empty.num_columns(), 5);
    }

    #[test]
    fn test_parquet_and_json_files() {
        let dir = tempfile::tempdir().unwrap();

        let parquet_path = dir.path().join("out").join("rates.parquet");
        write_series_parquet(&parquet_path, &rates()).unwrap();
        let back: Vec<QuarterlyRateRecord> = read_series_parquet(&parquet_path).unwrap();
        assert_eq!(back, rates());

        let rows = vec![ComparisonRow {
            year: 2021,
            quarter: 3,
            left: 1.5,
            right: 2.5,
        }];
        let json_path = dir.path().join("comparison.json");
        write_series_json(&json_path, &rows).unwrap();
        let text = std::fs::read_to_string(&json_path).unwrap();
        assert!(text.contains("\"left\": 1.5"));
        let back: Vec<ComparisonRow> = read_series_json(&json_path).unwrap();
        assert_eq!(back, rows);
    }
}
