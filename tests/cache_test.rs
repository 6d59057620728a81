//! Raw extracts through the parquet cache into the pipelines

mod utils;

use labor_indicators::algorithm::ZoneSelector;
use labor_indicators::export::{read_series_parquet, write_series_parquet};
use labor_indicators::models::{QuarterlyRateRecord, Zone};
use labor_indicators::provider::precache_geography;
use labor_indicators::{
    AnalysisConfig, AnalysisContext, IndicatorError, ParquetCacheProvider, RecordProvider, Slice,
    collect_records,
};
use utils::{q, write_raw_extract};

fn config(root: &std::path::Path) -> AnalysisConfig {
    AnalysisConfig {
        first_year: 2019,
        last_year: 2019,
        raw_dir: root.join("raw"),
        cache_dir: root.join("parquet"),
        ..AnalysisConfig::default()
    }
}

#[test]
fn test_precache_then_compute() -> labor_indicators::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = config(dir.path());

    write_raw_extract(
        &config.raw_dir,
        q(2019, 1),
        &[
            "A;2019;1;10;1;1;34;100;50000",
            "B;2019;1;10;2;2;29;100;0",
            "C;2019;1;33;1;1;40;900;90000",
            "D;2019;1;10;3;2;70;200;20000",
        ],
    );
    write_raw_extract(
        &config.raw_dir,
        q(2019, 2),
        &["E;2019;2;10;1;2;41;50;60000", "F;2019;2;10;1;1;8;50;0"],
    );

    let summary = precache_geography(&config, "gran_mendoza")?;
    assert_eq!(summary.written, 2);
    assert_eq!(summary.rows, 5);

    let provider = ParquetCacheProvider::from_config(&config);
    assert!(provider.get_records("gran_mendoza", q(2019, 3))?.is_none());

    let records = collect_records(&provider, "gran_mendoza", config.years())?;
    assert_eq!(records.len(), 5);

    let context = AnalysisContext::from_price_index(config.clone(), Vec::new());
    let rates = context.rates(&records, Slice::All);
    assert_eq!(rates.len(), 2);
    assert!((rates[0].activity_pct - 50.0).abs() < 1e-9);
    assert!((rates[0].unemployment_pct - 50.0).abs() < 1e-9);
    // the eight-year-old is below working age
    assert_eq!(rates[1].employment_pct, 100.0);

    let out = dir.path().join("series").join("rates.parquet");
    write_series_parquet(&out, &rates)?;
    let back: Vec<QuarterlyRateRecord> = read_series_parquet(&out)?;
    assert_eq!(back, rates);
    Ok(())
}

#[test]
fn test_zone_detection_failure_surfaces() -> labor_indicators::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = config(dir.path());
    write_raw_extract(&config.raw_dir, q(2019, 1), &["A;2019;1;33;1;1;34;100;5"]);
    precache_geography(&config, "gba")?;

    // the quarter column holds only "1" and is taken for a zone column
    let detected = ParquetCacheProvider::from_config(&config).with_zone(ZoneSelector::Detect);
    let records = detected.get_records("gba", q(2019, 1))?.unwrap_or_default();
    assert_eq!(records[0].zone, Some(Zone::Urban));

    let named = ParquetCacheProvider::from_config(&config)
        .with_zone(ZoneSelector::Column("ZONA".to_string()));
    assert!(matches!(
        named.get_records("gba", q(2019, 1)),
        Err(IndicatorError::ColumnNotFound { .. })
    ));
    Ok(())
}
