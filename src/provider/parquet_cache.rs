//! Provider over the per-geography parquet cache

use std::path::PathBuf;

use log::debug;

use crate::algorithm::zone::ZoneSelector;
use crate::config::{AnalysisConfig, SurveyColumns};
use crate::error::Result;
use crate::models::{Period, SurveyRecord};
use crate::provider::{RecordProvider, records_from_batches};
use crate::utils::io::{SurveyKind, cache_path, read_parquet};

/// Reads individual extracts from `{cache_dir}/{geography}/individual/`
#[derive(Debug, Clone)]
pub struct ParquetCacheProvider {
    cache_dir: PathBuf,
    columns: SurveyColumns,
    zone: Option<ZoneSelector>,
}

impl ParquetCacheProvider {
    /// Create a provider rooted at a cache directory
    #[must_use]
    pub fn new(cache_dir: impl Into<PathBuf>, columns: SurveyColumns) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            columns,
            zone: None,
        }
    }

    /// Create a provider from the cache directory and column layout of a config
    #[must_use]
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.cache_dir.clone(), config.columns.clone())
    }

    /// Also resolve the zone of every record
    #[must_use]
    pub fn with_zone(mut self, selector: ZoneSelector) -> Self {
        self.zone = Some(selector);
        self
    }

    fn projection(&self) -> Vec<&str> {
        let mut names = vec![
            self.columns.year.as_str(),
            self.columns.quarter.as_str(),
            self.columns.labor_state.as_str(),
            self.columns.age.as_str(),
            self.columns.weight.as_str(),
            self.columns.sex.as_str(),
            self.columns.income.as_str(),
        ];
        if let Some(ZoneSelector::Column(name)) = &self.zone {
            names.push(name.as_str());
        }
        names
    }
}

impl RecordProvider for ParquetCacheProvider {
    fn get_records(&self, geography: &str, period: Period) -> Result<Option<Vec<SurveyRecord>>> {
        let path = cache_path(&self.cache_dir, geography, SurveyKind::Individual, period);
        if !path.is_file() {
            debug!("No cached extract at {}", path.display());
            return Ok(None);
        }

        // detection needs every column to scan
        let projection = self.projection();
        let columns = match self.zone {
            Some(ZoneSelector::Detect) => None,
            _ => Some(projection.as_slice()),
        };

        let batches = read_parquet(&path, columns)?;
        let records =
            records_from_batches(&batches, &self.columns, Some(period), self.zone.as_ref())?;

        Ok(Some(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::io::write_parquet;
    use arrow::array::{ArrayRef, StringArray};
    use arrow::record_batch::RecordBatch;
    use std::sync::Arc;

    fn strings(values: &[&str]) -> ArrayRef {
        Arc::new(StringArray::from(values.to_vec()))
    }

    #[test]
    fn test_reads_cached_period() {
        let dir = tempfile::tempdir().unwrap();
        let period = Period::new(2019, 2).unwrap();
        let batch = RecordBatch::try_from_iter(vec![
            ("ANO4", strings(&["2019", "2019"])),
            ("TRIMESTRE", strings(&["2", "2"])),
            ("ESTADO", strings(&["1", "2"])),
            ("CH06", strings(&["30", "45"])),
            ("PONDERA", strings(&["10", "20"])),
            ("CH04", strings(&["1", "2"])),
            ("P47T", strings(&["1000", "-9"])),
            ("ZONA", strings(&["urbano", "rural"])),
        ])
        .unwrap();
        let path = cache_path(dir.path(), "gba", SurveyKind::Individual, period);
        write_parquet(&path, batch.schema(), &[batch]).unwrap();

        let provider = ParquetCacheProvider::new(dir.path(), SurveyColumns::default())
            .with_zone(ZoneSelector::Column("ZONA".to_string()));

        let records = provider.get_records("gba", period).unwrap().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].weight.as_deref(), Some("20"));
        assert_eq!(records[1].zone, Some(crate::models::Zone::Rural));
        assert!(records.iter().all(|r| r.period == period));

        assert!(provider.get_records("gba", period.next()).unwrap().is_none());
        assert!(provider.get_records("gran_mendoza", period).unwrap().is_none());
    }
}
