use crate::error::SignalError;
use crate::services::MovingAverageSignal;
use crate::types::InstrumentSpec;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

/// Instrument list as stored in the tickers file.
///
/// ```json
/// {"tickers": ["AAPL"], "indices": {"S&P 500": "^GSPC"}, "rate_series": ["CPI"]}
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TickerFile {
    #[serde(default)]
    pub tickers: Vec<String>,
    /// Named reference symbols merged in after the tickers.
    #[serde(default)]
    pub indices: BTreeMap<String, String>,
    /// Symbols plotted as month-over-month percentage change.
    #[serde(default)]
    pub rate_series: Vec<String>,
}

impl TickerFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Ordered batch input: tickers first, then index symbols, without duplicates.
    pub fn instruments(&self, extra_rate_series: &[String]) -> Vec<InstrumentSpec> {
        let is_rate = |symbol: &str| {
            self.rate_series
                .iter()
                .chain(extra_rate_series)
                .any(|s| s.eq_ignore_ascii_case(symbol))
        };

        let mut specs: Vec<InstrumentSpec> = Vec::new();
        for symbol in self.tickers.iter().chain(self.indices.values()) {
            let symbol = symbol.trim();
            if symbol.is_empty() || specs.iter().any(|s| s.symbol == symbol) {
                continue;
            }
            specs.push(if is_rate(symbol) {
                InstrumentSpec::rate_series(symbol)
            } else {
                InstrumentSpec::level(symbol)
            });
        }
        specs
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// JSON file listing the instruments to fetch.
    pub tickers_file: PathBuf,
    /// Directory holding one persisted record per symbol.
    pub output_dir: PathBuf,
    /// Directory the HTML pages are written to.
    pub site_dir: PathBuf,
    /// First date requested from the price provider.
    pub start_date: NaiveDate,
    /// Short moving average window (days).
    pub short_window: usize,
    /// Long moving average window (days).
    pub long_window: usize,
    /// Maximum number of instruments fetched at once.
    pub fetch_concurrency: usize,
    /// Additional month-over-month symbols on top of the tickers file.
    pub rate_series_symbols: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default_values();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            tickers_file: env::var("TICKERS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.tickers_file),
            output_dir: env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            site_dir: env::var("SITE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.site_dir),
            start_date: env::var("START_DATE")
                .ok()
                .and_then(|v| NaiveDate::parse_from_str(&v, "%Y-%m-%d").ok())
                .unwrap_or(defaults.start_date),
            short_window: env::var("SHORT_WINDOW")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.short_window),
            long_window: env::var("LONG_WINDOW")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.long_window),
            fetch_concurrency: env::var("FETCH_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.fetch_concurrency),
            rate_series_symbols: env::var("RATE_SERIES_SYMBOLS")
                .ok()
                .map(|s| parse_symbol_list(&s))
                .unwrap_or_default(),
        }
    }

    /// Built-in defaults, independent of the environment.
    pub fn default_values() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            tickers_file: PathBuf::from("tickers.json"),
            output_dir: PathBuf::from("tickers"),
            site_dir: PathBuf::from("site"),
            start_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or_default(),
            short_window: 5,
            long_window: 10,
            fetch_concurrency: 4,
            rate_series_symbols: Vec::new(),
        }
    }

    /// The configured moving average pair, validated.
    pub fn signal(&self) -> Result<MovingAverageSignal, SignalError> {
        MovingAverageSignal::new(self.short_window, self.long_window)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Split a comma separated symbol list.
fn parse_symbol_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
