//! Yahoo Finance API client for daily price history.
//!
//! Uses the unofficial v8 chart endpoint, which needs no API key.

use super::PriceSource;
use crate::error::FetchError;
use crate::types::PricePoint;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: YahooMeta,
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct YahooMeta {
    symbol: String,
    short_name: Option<String>,
    long_name: Option<String>,
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
    #[serde(default)]
    adjclose: Vec<YahooAdjClose>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct YahooAdjClose {
    adjclose: Option<Vec<Option<f64>>>,
}

/// Normalize symbol for Yahoo Finance API.
/// Yahoo uses hyphens instead of dots for share classes (e.g., BRK-B not BRK.B)
fn normalize_yahoo_symbol(symbol: &str) -> String {
    symbol.to_uppercase().replace('.', "-")
}

/// Exchange-local trading date of a bar timestamp.
fn trading_date(timestamp: i64, gmtoffset: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp(timestamp + gmtoffset, 0).map(|dt| dt.date_naive())
}

/// Display name from chart metadata, falling back to the symbol.
fn meta_display_name(meta: &YahooMeta, symbol: &str) -> String {
    let usable = |name: &Option<String>| {
        name.as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
    };
    usable(&meta.short_name)
        .or_else(|| usable(&meta.long_name))
        .unwrap_or_else(|| symbol.to_string())
}

/// Extract the first result of a chart response.
fn first_result(data: YahooChartResponse, symbol: &str) -> Result<YahooResult, FetchError> {
    if let Some(error) = data.chart.error {
        if error.code.eq_ignore_ascii_case("Not Found") {
            return Err(FetchError::NoData(symbol.to_string()));
        }
        return Err(FetchError::Provider(format!(
            "Yahoo API error: {} - {}",
            error.code, error.description
        )));
    }

    data.chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| FetchError::NoData(symbol.to_string()))
}

/// Turn a chart result into an ascending, de-duplicated daily series.
///
/// Adjusted closes are preferred when present. Rows with no close are dropped;
/// when two rows land on the same trading date the later one wins.
fn parse_daily_series(result: YahooResult, symbol: &str) -> Result<Vec<PricePoint>, FetchError> {
    let timestamps = result.timestamp.unwrap_or_default();

    let adjusted = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .and_then(|a| a.adjclose);
    let closes = match adjusted {
        Some(closes) => closes,
        None => result
            .indicators
            .quote
            .into_iter()
            .next()
            .and_then(|q| q.close)
            .unwrap_or_default(),
    };

    let mut by_date = BTreeMap::new();
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let Some(close) = closes.get(i).copied().flatten() else {
            continue;
        };
        if !close.is_finite() {
            continue;
        }
        match trading_date(timestamp, result.meta.gmtoffset) {
            Some(date) => {
                by_date.insert(date, close);
            }
            None => warn!("{}: dropping bar with invalid timestamp {}", symbol, timestamp),
        }
    }

    if by_date.is_empty() {
        return Err(FetchError::NoData(symbol.to_string()));
    }

    Ok(by_date
        .into_iter()
        .map(|(date, close)| PricePoint::new(date, close))
        .collect())
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client.
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self { client })
    }

    async fn get_chart(
        &self,
        symbol: &str,
        query: &[(&str, String)],
    ) -> Result<YahooResult, FetchError> {
        let url = format!("{}/{}", CHART_URL, normalize_yahoo_symbol(symbol));
        debug!("Fetching Yahoo Finance data: {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NoData(symbol.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Provider(format!("API error: {}", status)));
        }

        let data: YahooChartResponse = response.json().await?;
        first_result(data, symbol)
    }
}

#[async_trait]
impl PriceSource for YahooFinanceClient {
    async fn fetch(&self, symbol: &str, start: NaiveDate) -> Result<Vec<PricePoint>, FetchError> {
        let period1 = start
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or_default();
        let period2 = Utc::now().timestamp();

        let query = [
            ("period1", period1.to_string()),
            ("period2", period2.to_string()),
            ("interval", "1d".to_string()),
            ("includePrePost", "false".to_string()),
        ];
        let result = self.get_chart(symbol, &query).await?;
        parse_daily_series(result, symbol)
    }

    async fn display_name(&self, symbol: &str) -> String {
        let query = [
            ("range", "5d".to_string()),
            ("interval", "1d".to_string()),
        ];
        match self.get_chart(symbol, &query).await {
            Ok(result) => meta_display_name(&result.meta, symbol),
            Err(e) => {
                debug!("No display name for {}: {}", symbol, e);
                symbol.to_string()
            }
        }
    }
}
