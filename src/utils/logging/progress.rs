//! Progress reporting for multi-period loading and precaching, using indicatif.

use indicatif::{ProgressBar, ProgressStyle};

/// Template for per-period progress bars
pub const PERIOD_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} periods {msg}";

/// Create a progress bar counting survey periods
#[must_use]
pub fn create_period_progress_bar(periods: u64, description: Option<&str>) -> ProgressBar {
    let pb = ProgressBar::new(periods);
    let style = ProgressStyle::default_bar()
        .template(PERIOD_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);

    if let Some(desc) = description {
        pb.set_message(desc.to_string());
    }

    pb
}

/// Finish a progress bar with an optional completion message
pub fn finish_progress_bar(pb: &ProgressBar, message: Option<&str>) {
    match message {
        Some(msg) => pb.finish_with_message(msg.to_string()),
        None => pb.finish(),
    }
}
