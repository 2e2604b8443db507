use krk_stoch::chart::JsonChartWriter;
use krk_stoch::source::{CsvSource, write_snapshot};
use krk_stoch::{
    AnalyzerError, AnalyzerState, FetchError, MarketDataSource, PairAnalyzer, PairSymbol,
    StochasticConfig, list_supported_pairs,
};
use std::fs;
use std::path::PathBuf;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("krk-stoch-it-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn zec() -> PairSymbol {
    PairSymbol::new("XZECZEUR").unwrap()
}

fn csv_analyzer(chart_dir: &PathBuf) -> PairAnalyzer {
    PairAnalyzer::new(
        zec(),
        Box::new(CsvSource::new(data_dir())),
        Box::new(JsonChartWriter::new(chart_dir)),
    )
}

#[test]
fn catalog_lists_the_fixture_pair() {
    let pairs = list_supported_pairs();
    assert!(pairs.contains(&"XZECZEUR"));
    assert!(pairs.iter().all(|p| PairSymbol::new(*p).is_ok()));
}

#[test]
fn fixture_loads_and_yields_default_oscillator() {
    let charts = scratch_dir("default");
    let mut analyzer = csv_analyzer(&charts);

    let series = analyzer.load_data().unwrap();
    assert_eq!(series.len(), 40);

    let result = analyzer.compute_default_stochastic().unwrap();
    assert_eq!((result.k_period, result.d_period), (14, 3));
    assert_eq!(result.k.len(), 27);
    assert_eq!(result.d.len(), 25);
    assert!(result.k.iter().chain(&result.d).all(|v| (0.0..=100.0).contains(v)));
}

#[test]
fn empty_analyzer_refuses_work() {
    let charts = scratch_dir("empty");
    let analyzer = csv_analyzer(&charts);

    assert_eq!(analyzer.state(), &AnalyzerState::Empty);
    for outcome in [
        analyzer.compute_stochastic(14, 3).map(|_| ()),
        analyzer.request_price_chart(),
        analyzer.request_stochastic_chart(),
    ] {
        assert!(matches!(outcome, Err(AnalyzerError::InvalidState { .. })));
    }
    assert!(!charts.exists());
}

#[test]
fn charts_are_written_for_loaded_pair() {
    let charts = scratch_dir("charts");
    let mut analyzer = csv_analyzer(&charts).with_periods(StochasticConfig {
        k_period: 5,
        d_period: 3,
    });
    analyzer.load_data().unwrap();

    analyzer.request_price_chart().unwrap();
    analyzer.request_stochastic_chart().unwrap();

    let stoch: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(charts.join("XZECZEUR_stochastic.json")).unwrap())
            .unwrap();
    assert_eq!(stoch["k_period"], 5);
    assert_eq!(stoch["k"]["values"].as_array().unwrap().len(), 36);
    assert_eq!(stoch["d"]["values"].as_array().unwrap().len(), 34);
    assert!(charts.join("XZECZEUR_price.json").exists());
    fs::remove_dir_all(charts).unwrap();
}

#[test]
fn missing_snapshot_is_a_data_acquisition_failure() {
    let charts = scratch_dir("missing");
    let mut analyzer = PairAnalyzer::new(
        PairSymbol::new("XXBTZEUR").unwrap(),
        Box::new(CsvSource::new(data_dir())),
        Box::new(JsonChartWriter::new(&charts)),
    );

    let err = analyzer.load_data().unwrap_err();
    assert!(matches!(err, AnalyzerError::DataAcquisition(FetchError::Io(_))));
    assert!(!analyzer.is_loaded());
}

#[test]
fn snapshot_export_reads_back_identically() {
    let dir = scratch_dir("snapshot");
    let original = CsvSource::new(data_dir()).fetch(&zec()).unwrap();

    let path = dir.join("XZECZEUR.csv");
    write_snapshot(&path, &original).unwrap();
    let reread = CsvSource::new(&path).fetch(&zec()).unwrap();

    assert_eq!(reread, original);
    fs::remove_dir_all(dir).unwrap();
}
