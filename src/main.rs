use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;
use serde::de::DeserializeOwned;

use labor_indicators::algorithm::{Indicator, ZoneSelector, compare_series, latest_value};
use labor_indicators::export::{write_series_json, write_series_parquet};
use labor_indicators::models::{Sex, Slice, SurveyRecord, Zone, load_inflation_table};
use labor_indicators::provider::{ParquetCacheProvider, collect_records, precache_geography};
use labor_indicators::{AnalysisConfig, AnalysisContext, CompoundingPolicy};

#[derive(Parser)]
#[command(name = "eph-indicators")]
#[command(about = "Labor-market and income indicators from household-survey microdata")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// First survey year to include
    #[arg(long, global = true)]
    first_year: Option<i32>,
    /// Last survey year to include
    #[arg(long, global = true)]
    last_year: Option<i32>,
    /// Root of the parquet cache
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,
    /// Root of the raw delimited extracts
    #[arg(long, global = true)]
    raw_dir: Option<PathBuf>,
    /// Worker threads for multi-geography runs
    #[arg(long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter raw extracts into the per-geography parquet cache
    Precache {
        /// Geographies to cache (defaults to every configured geography)
        #[arg(long = "geography")]
        geographies: Vec<String>,
    },
    /// Activity, employment and unemployment rates per quarter
    Rates {
        #[arg(long)]
        geography: String,
        #[command(flatten)]
        slice: SliceArgs,
        /// Output file (.parquet or .json); prints JSON when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Nominal and inflation-adjusted mean income per quarter
    Income {
        #[arg(long)]
        geography: String,
        #[command(flatten)]
        slice: SliceArgs,
        #[command(flatten)]
        inflation: InflationArgs,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// One indicator for two geographies side by side
    Compare {
        #[arg(long, value_enum)]
        indicator: IndicatorArg,
        #[arg(long)]
        left: String,
        #[arg(long)]
        right: String,
        #[command(flatten)]
        inflation: InflationArgs,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SliceArgs {
    /// Subset of respondents
    #[arg(long, value_enum, default_value_t = SliceArg::All)]
    slice: SliceArg,
    /// Column holding the urban/rural zone
    #[arg(long)]
    zone_column: Option<String>,
}

#[derive(Args)]
struct InflationArgs {
    /// JSON table of monthly inflation rates
    #[arg(long, default_value = "inflacion.json")]
    inflation: PathBuf,
    /// Group months by calendar quarter instead of by position
    #[arg(long)]
    calendar: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SliceArg {
    All,
    Male,
    Female,
    Urban,
    Rural,
}

impl From<SliceArg> for Slice {
    fn from(arg: SliceArg) -> Self {
        match arg {
            SliceArg::All => Self::All,
            SliceArg::Male => Self::Sex(Sex::Male),
            SliceArg::Female => Self::Sex(Sex::Female),
            SliceArg::Urban => Self::Zone(Zone::Urban),
            SliceArg::Rural => Self::Zone(Zone::Rural),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum IndicatorArg {
    Activity,
    Employment,
    Unemployment,
    NominalIncome,
    RealIncome,
}

impl From<IndicatorArg> for Indicator {
    fn from(arg: IndicatorArg) -> Self {
        match arg {
            IndicatorArg::Activity => Self::Activity,
            IndicatorArg::Employment => Self::Employment,
            IndicatorArg::Unemployment => Self::Unemployment,
            IndicatorArg::NominalIncome => Self::NominalIncome,
            IndicatorArg::RealIncome => Self::RealIncome,
        }
    }
}

fn build_config(common: &CommonArgs) -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    if let Some(year) = common.first_year {
        config.first_year = year;
    }
    if let Some(year) = common.last_year {
        config.last_year = year;
    }
    if let Some(dir) = &common.cache_dir {
        config.cache_dir.clone_from(dir);
    }
    if let Some(dir) = &common.raw_dir {
        config.raw_dir.clone_from(dir);
    }
    config.threads = common.threads;
    config
}

fn build_context(mut config: AnalysisConfig, inflation: &InflationArgs) -> Result<AnalysisContext> {
    if inflation.calendar {
        config.compounding = CompoundingPolicy::Calendar;
    }
    let monthly = load_inflation_table(&inflation.inflation).with_context(|| {
        format!("Failed to load inflation table {}", inflation.inflation.display())
    })?;
    Ok(AnalysisContext::new(config, &monthly)?)
}

fn load_records(
    config: &AnalysisConfig,
    geography: &str,
    slice: &SliceArgs,
) -> Result<Vec<SurveyRecord>> {
    config.geography_code(geography)?;

    let mut provider = ParquetCacheProvider::from_config(config);
    match (slice.slice, &slice.zone_column) {
        (_, Some(column)) => provider = provider.with_zone(ZoneSelector::Column(column.clone())),
        (SliceArg::Urban | SliceArg::Rural, None) => {
            provider = provider.with_zone(ZoneSelector::Detect);
        }
        _ => {}
    }

    let records = collect_records(&provider, geography, config.years())
        .with_context(|| format!("Failed to load survey records for {geography}"))?;
    if records.is_empty() {
        bail!(
            "No cached survey data for {geography} under {}; run `precache` first",
            config.cache_dir.display()
        );
    }
    Ok(records)
}

fn ensure_distinct(left: &str, right: &str) -> Result<()> {
    if left == right {
        bail!("Comparison needs two distinct geographies, got {left} twice");
    }
    Ok(())
}

fn emit<T>(rows: &[T], output: Option<&Path>) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    match output {
        Some(path) if path.extension().is_some_and(|ext| ext == "parquet") => {
            write_series_parquet(path, rows)?;
        }
        Some(path) => write_series_json(path, rows)?,
        None => println!("{}", serde_json::to_string_pretty(rows)?),
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = build_config(&cli.common);
    let start = Instant::now();

    match cli.command {
        Commands::Precache { geographies } => {
            let geographies = if geographies.is_empty() {
                config.geographies.keys().cloned().collect()
            } else {
                geographies
            };
            for geography in &geographies {
                let summary = precache_geography(&config, geography)
                    .with_context(|| format!("Failed to precache {geography}"))?;
                info!(
                    "{geography}: wrote {} files ({} rows), {} extracts missing",
                    summary.written, summary.rows, summary.missing
                );
            }
        }
        Commands::Rates {
            geography,
            slice,
            output,
        } => {
            let context = AnalysisContext::from_price_index(config, Vec::new());
            let records = load_records(context.config(), &geography, &slice)?;
            let rates = context.rates(&records, slice.slice.into());
            emit(&rates, output.as_deref())?;
        }
        Commands::Income {
            geography,
            slice,
            inflation,
            output,
        } => {
            let context = build_context(config, &inflation)?;
            let records = load_records(context.config(), &geography, &slice)?;
            let income = context.real_income(&records, slice.slice.into());
            if let Some((period, value)) = latest_value(&income, Indicator::RealIncome) {
                info!("Latest real income for {geography}: {value:.2} ({period})");
            }
            emit(&income, output.as_deref())?;
        }
        Commands::Compare {
            indicator,
            left,
            right,
            inflation,
            output,
        } => {
            ensure_distinct(&left, &right)?;
            let context = build_context(config, &inflation)?;
            let provider = ParquetCacheProvider::from_config(context.config());
            let geographies = [left.as_str(), right.as_str()];
            let results = context.analyze_geographies(&provider, &geographies)?;
            let (Some(l), Some(r)) = (results.get(&left), results.get(&right)) else {
                bail!("Missing indicators for {left} or {right}");
            };

            let indicator = Indicator::from(indicator);
            let rows = match indicator {
                Indicator::NominalIncome | Indicator::RealIncome => {
                    compare_series(&l.overall.real_income, &r.overall.real_income, indicator)
                }
                _ => compare_series(&l.overall.rates, &r.overall.rates, indicator),
            };
            info!("{indicator}: {left} vs {right} over {} quarters", rows.len());
            emit(&rows, output.as_deref())?;
        }
    }

    info!("Finished in {:?}", start.elapsed());
    Ok(())
}
