//! Arrow data handling utilities

pub mod extractors;

pub use extractors::{column_strings, extract_strings};
