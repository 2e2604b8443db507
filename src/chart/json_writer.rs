// Writes plot payloads as JSON for an external plotting tool.
use crate::chart::ChartRenderer;
use crate::model::{ChartError, PairSymbol, PriceSeries, StochasticResult};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

const OVERBOUGHT: f64 = 80.0;
const OVERSOLD: f64 = 20.0;

#[derive(Debug, Serialize)]
struct PriceChart<'a> {
    title: String,
    pair: &'a str,
    timestamps: Vec<DateTime<Utc>>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct Line<'a> {
    label: &'static str,
    timestamps: &'a [DateTime<Utc>],
    values: &'a [f64],
}

#[derive(Debug, Serialize)]
struct StochasticChart<'a> {
    title: String,
    pair: &'a str,
    k_period: usize,
    d_period: usize,
    close: Line<'a>,
    k: Line<'a>,
    d: Line<'a>,
    overbought: f64,
    oversold: f64,
}

pub struct JsonChartWriter {
    dir: PathBuf,
}

impl JsonChartWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn price_path(&self, pair: &PairSymbol) -> PathBuf {
        self.dir.join(format!("{}_price.json", pair))
    }

    pub fn stochastic_path(&self, pair: &PairSymbol) -> PathBuf {
        self.dir.join(format!("{}_stochastic.json", pair))
    }

    fn write<T: Serialize>(&self, path: &Path, payload: &T) -> Result<(), ChartError> {
        fs::create_dir_all(&self.dir)?;
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, payload)?;
        writer.flush()?;
        info!("📈 Chart written to {}", path.display());
        Ok(())
    }
}

impl ChartRenderer for JsonChartWriter {
    fn render_price_series(&self, pair: &PairSymbol, series: &PriceSeries) -> Result<(), ChartError> {
        let bars = series.bars();
        let payload = PriceChart {
            title: format!("{} price", pair),
            pair: pair.as_str(),
            timestamps: series.timestamps(),
            open: bars.iter().map(|b| b.open).collect(),
            high: bars.iter().map(|b| b.high).collect(),
            low: bars.iter().map(|b| b.low).collect(),
            close: bars.iter().map(|b| b.close).collect(),
            volume: bars.iter().map(|b| b.volume).collect(),
        };
        self.write(&self.price_path(pair), &payload)
    }

    fn render_stochastic(
        &self,
        pair: &PairSymbol,
        series: &PriceSeries,
        result: &StochasticResult,
    ) -> Result<(), ChartError> {
        let timestamps = series.timestamps();
        let closes: Vec<f64> = series.bars().iter().map(|b| b.close).collect();
        let payload = StochasticChart {
            title: format!(
                "{} stochastic ({}, {})",
                pair, result.k_period, result.d_period
            ),
            pair: pair.as_str(),
            k_period: result.k_period,
            d_period: result.d_period,
            close: Line {
                label: "close",
                timestamps: &timestamps,
                values: &closes,
            },
            k: Line {
                label: "%K",
                timestamps: &result.timestamps,
                values: &result.k,
            },
            d: Line {
                label: "%D",
                timestamps: result.d_timestamps(),
                values: &result.d,
            },
            overbought: OVERBOUGHT,
            oversold: OVERSOLD,
        };
        self.write(&self.stochastic_path(pair), &payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::compute_stochastic;
    use crate::model::PriceBar;
    use crate::utils::from_unix_secs;
    use serde_json::Value;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "krk-stoch-{}-{}-{}",
            name,
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn series() -> PriceSeries {
        let bars = (0..6)
            .map(|i| PriceBar {
                timestamp: from_unix_secs(1_709_251_200 + i * 86_400).unwrap(),
                open: 1.0,
                high: 2.0 + i as f64,
                low: 0.5,
                close: 1.5 + i as f64,
                volume: 3.0,
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn writes_price_payload() {
        let dir = scratch_dir("price");
        let writer = JsonChartWriter::new(&dir);
        let pair = PairSymbol::new("XZECZEUR").unwrap();

        writer.render_price_series(&pair, &series()).unwrap();

        let json = read_json(&writer.price_path(&pair));
        assert_eq!(json["pair"], "XZECZEUR");
        assert_eq!(json["close"].as_array().unwrap().len(), 6);
        assert_eq!(json["timestamps"].as_array().unwrap().len(), 6);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn writes_stochastic_payload_with_aligned_lines() {
        let dir = scratch_dir("stoch");
        let writer = JsonChartWriter::new(&dir);
        let pair = PairSymbol::new("XZECZEUR").unwrap();
        let series = series();
        let result = compute_stochastic(series.bars(), 3, 2).unwrap();

        writer.render_stochastic(&pair, &series, &result).unwrap();

        let json = read_json(&writer.stochastic_path(&pair));
        assert_eq!(json["k"]["values"].as_array().unwrap().len(), 4);
        assert_eq!(json["k"]["timestamps"].as_array().unwrap().len(), 4);
        assert_eq!(json["d"]["values"].as_array().unwrap().len(), 3);
        assert_eq!(json["d"]["timestamps"].as_array().unwrap().len(), 3);
        assert_eq!(json["overbought"], 80.0);
        fs::remove_dir_all(dir).unwrap();
    }
}
