//! Shared utilities: Arrow extraction, parquet IO and logging

pub mod arrow;
pub mod io;
pub mod logging;
