//! Logging utilities for output and progress tracking

pub mod log;
pub mod progress;

pub use log::{
    log_exclusions, log_operation_complete, log_operation_start, log_period_gap, log_warning,
};
pub use progress::{create_period_progress_bar, finish_progress_bar};
