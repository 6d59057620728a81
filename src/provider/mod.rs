//! Record-set providers
//!
//! The pipelines consume survey records one geography and period at a time.
//! A provider returns `Ok(None)` for a period it has no data for; callers treat
//! that as a gap and keep going with the periods that exist.

pub mod extract;
pub mod memory;
pub mod parquet_cache;
pub mod precache;

use std::ops::RangeInclusive;

use log::info;

use crate::error::Result;
use crate::models::{Period, SurveyRecord};
use crate::utils::logging::{create_period_progress_bar, finish_progress_bar, log_period_gap};

pub use extract::{records_from_batch, records_from_batches};
pub use memory::InMemoryProvider;
pub use parquet_cache::ParquetCacheProvider;
pub use precache::{PrecacheSummary, precache_geography};

/// Source of survey records for one geography and period
pub trait RecordProvider: Send + Sync {
    /// Records of a geography in a period, or `None` when the period is absent
    fn get_records(&self, geography: &str, period: Period) -> Result<Option<Vec<SurveyRecord>>>;
}

/// Gather every available period of the given years for a geography
///
/// Absent periods are logged and skipped. Errors from the provider propagate.
pub fn collect_records<P: RecordProvider + ?Sized>(
    provider: &P,
    geography: &str,
    years: RangeInclusive<i32>,
) -> Result<Vec<SurveyRecord>> {
    let periods: Vec<Period> = Period::quarters_of(years).collect();
    let pb = create_period_progress_bar(periods.len() as u64, Some(geography));

    let mut records = Vec::new();
    let mut available = 0usize;

    for period in periods {
        match provider.get_records(geography, period)? {
            Some(batch) => {
                available += 1;
                records.extend(batch);
            }
            None => log_period_gap(geography, period),
        }
        pb.inc(1);
    }

    finish_progress_bar(&pb, Some("loaded"));
    info!(
        "Collected {} records from {available} periods for {geography}",
        records.len()
    );
    Ok(records)
}
