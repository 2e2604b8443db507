use krk_stoch::catalog::{is_supported, list_supported_pairs};
use krk_stoch::chart::JsonChartWriter;
use krk_stoch::config::{AppConfig, SourceKind, load_config};
use krk_stoch::source::{CachedSource, CsvSource, KrakenSource, MarketDataSource, write_snapshot};
use krk_stoch::storage::SqliteStorage;
use krk_stoch::PairAnalyzer;

use std::error::Error;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Initialize logging, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let arg = std::env::args().nth(1);
    if arg.as_deref() == Some("--pairs") {
        for pair in list_supported_pairs() {
            println!("{}", pair);
        }
        return ExitCode::SUCCESS;
    }

    // Load configuration from file
    let config_path = arg.unwrap_or_else(|| "config.json".to_string());
    let config = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error ({}): {}", config_path, e);
            return ExitCode::FAILURE;
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load, compute and chart the configured pair.
fn run(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    if !is_supported(config.pair.as_str()) {
        warn!(
            "Pair {} is not in the supported catalog; run with --pairs to list them",
            config.pair
        );
    }

    let source = build_source(config)?;
    let charts = JsonChartWriter::new(&config.chart_dir);
    let mut analyzer = PairAnalyzer::new(config.pair.clone(), source, Box::new(charts))
        .with_periods(config.stochastic);

    let series = analyzer.load_data()?;
    if let Some(path) = &config.snapshot_path {
        if let Err(e) = write_snapshot(path, series) {
            warn!("Snapshot export failed: {}", e);
        }
    }

    let result = analyzer.compute_default_stochastic()?;
    let last_close = analyzer.series()?.last().close;
    info!(
        "{} close {:.4} | %K({}) {} | %D({}) {}",
        config.pair,
        last_close,
        result.k_period,
        fmt_value(result.latest_k()),
        result.d_period,
        fmt_value(result.latest_d())
    );

    analyzer.request_price_chart()?;
    analyzer.request_stochastic_chart()?;
    info!("Finished analysis of {}", config.pair);
    Ok(())
}

fn build_source(config: &AppConfig) -> Result<Box<dyn MarketDataSource>, Box<dyn Error>> {
    let timeout = Duration::from_secs(config.request_timeout_seconds);
    let source: Box<dyn MarketDataSource> = match config.source {
        SourceKind::Kraken => Box::new(KrakenSource::new(config.interval_minutes, timeout)?),
        SourceKind::Csv => {
            let path = config.csv_path.clone().ok_or("source \"csv\" requires csv_path")?;
            Box::new(CsvSource::new(path))
        }
        SourceKind::Cached => {
            let upstream = KrakenSource::new(config.interval_minutes, timeout)?;
            let source_id = upstream.cache_key();
            let storage = SqliteStorage::new(&config.db_path)?;
            let max_age = i64::try_from(config.cache_max_age_seconds)
                .ok()
                .and_then(chrono::Duration::try_seconds)
                .ok_or("cache_max_age_seconds out of range")?;
            Box::new(CachedSource::new(upstream, source_id, storage, max_age))
        }
    };
    Ok(source)
}

fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}
