//! Provider over records already held in memory

use std::collections::HashMap;

use crate::error::Result;
use crate::models::{Period, SurveyRecord};
use crate::provider::RecordProvider;

/// Records keyed by geography and period
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    records: HashMap<(String, Period), Vec<SurveyRecord>>,
}

impl InMemoryProvider {
    /// Create an empty provider
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records of a geography, filed under each record's own period
    pub fn add_records(
        &mut self,
        geography: &str,
        records: impl IntoIterator<Item = SurveyRecord>,
    ) {
        for record in records {
            self.records
                .entry((geography.to_string(), record.period))
                .or_default()
                .push(record);
        }
    }

    /// Builder-style variant of [`Self::add_records`]
    #[must_use]
    pub fn with_records(
        mut self,
        geography: &str,
        records: impl IntoIterator<Item = SurveyRecord>,
    ) -> Self {
        self.add_records(geography, records);
        self
    }
}

impl RecordProvider for InMemoryProvider {
    fn get_records(&self, geography: &str, period: Period) -> Result<Option<Vec<SurveyRecord>>> {
        Ok(self
            .records
            .get(&(geography.to_string(), period))
            .cloned())
    }
}
