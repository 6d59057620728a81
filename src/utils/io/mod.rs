//! IO utilities for the survey cache and exported series

pub mod parquet;
pub mod paths;

pub use self::parquet::{DEFAULT_BATCH_SIZE, get_batch_size, read_parquet, write_parquet};
pub use self::paths::{SurveyKind, cache_path, raw_extract_path, survey_file_stem};
