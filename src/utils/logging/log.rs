//! Logging helpers
//!
//! Standardized messages for file operations, period gaps and row exclusions.

use std::path::Path;
use std::time::Duration;

use crate::models::Period;
use crate::validation::ExclusionReport;

/// Log the start of a file operation
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log the completion of a file operation
pub fn log_operation_complete(
    operation: &str,
    path: &Path,
    items: usize,
    elapsed: Option<Duration>,
) {
    match elapsed {
        Some(duration) => log::info!(
            "Successfully {operation} {items} items from {} in {duration:?}",
            path.display()
        ),
        None => log::info!("Successfully {operation} {items} items from {}", path.display()),
    }
}

/// Log a warning, optionally tied to a path
pub fn log_warning(message: &str, path: Option<&Path>) {
    if let Some(path) = path {
        log::warn!("{message}: {}", path.display());
    } else {
        log::warn!("{message}");
    }
}

/// Log a survey period that has no data for a geography
pub fn log_period_gap(geography: &str, period: Period) {
    log::warn!("No survey data for {geography} in {period}");
}

/// Log the rows a pipeline left out, at debug level unless most rows were lost
pub fn log_exclusions(label: &str, report: &ExclusionReport) {
    if report.total() > 0 && report.total_excluded() * 2 > report.total() {
        log::warn!("{label}: {report}");
    } else {
        log::debug!("{label}: {report}");
    }
}
