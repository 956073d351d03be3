pub mod yahoo;

pub use yahoo::YahooFinanceClient;

use crate::error::FetchError;
use crate::types::PricePoint;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Provider of daily price history.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Daily closes from `start` up to today, ascending with unique dates.
    ///
    /// An empty history is reported as [`FetchError::NoData`], never as `Ok(vec![])`.
    async fn fetch(&self, symbol: &str, start: NaiveDate) -> Result<Vec<PricePoint>, FetchError>;

    /// Human-readable instrument name, or the symbol itself when unknown.
    async fn display_name(&self, symbol: &str) -> String;
}
