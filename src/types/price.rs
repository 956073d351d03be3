use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One trading day of an instrument's history.
///
/// A non-finite `close` marks a malformed point. Such a point never feeds a
/// moving average and never renders as a bearish day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }

    /// Whether the close can take part in an average.
    pub fn is_valid(&self) -> bool {
        self.close.is_finite()
    }
}

/// Ordered daily history for one instrument, strictly increasing by date.
pub type PriceSeries = Vec<PricePoint>;

/// Per-day chart color derived from the bearish-cross flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendColor {
    Red,
    Black,
}

impl TrendColor {
    /// Red marks a bearish cross, black everything else.
    pub fn from_flag(flag: bool) -> Self {
        if flag {
            TrendColor::Red
        } else {
            TrendColor::Black
        }
    }

    pub fn is_bearish(&self) -> bool {
        matches!(self, TrendColor::Red)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendColor::Red => "red",
            TrendColor::Black => "black",
        }
    }
}

impl fmt::Display for TrendColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
