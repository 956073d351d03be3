use super::{PricePoint, TrendColor};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The persisted per-instrument chart record.
///
/// `dates`, `prices` and `colors` are parallel arrays. A `None` price is
/// rendered as a gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentRecord {
    pub dates: Vec<String>,
    pub prices: Vec<Option<f64>>,
    pub colors: Vec<TrendColor>,
    pub name: String,
}

impl InstrumentRecord {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Rebuild the typed series and flags carried by this record.
    ///
    /// Unavailable prices come back as NaN closes so that positions stay
    /// aligned. Unparseable dates are dropped together with their price and color.
    pub fn to_series_and_flags(&self) -> (Vec<PricePoint>, Vec<bool>) {
        let mut series = Vec::with_capacity(self.len());
        let mut flags = Vec::with_capacity(self.len());

        for ((date, price), color) in self.dates.iter().zip(&self.prices).zip(&self.colors) {
            let Ok(date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
                continue;
            };
            series.push(PricePoint::new(date, price.unwrap_or(f64::NAN)));
            flags.push(color.is_bearish());
        }

        (series, flags)
    }
}

/// How closes are turned into the plotted price values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTransform {
    /// Plot the close as reported.
    Level,
    /// Plot the percentage change from the previous observation.
    MonthOverMonthPercent,
}

impl Default for PriceTransform {
    fn default() -> Self {
        PriceTransform::Level
    }
}

/// One instrument to run through the batch pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentSpec {
    pub symbol: String,
    pub transform: PriceTransform,
}

impl InstrumentSpec {
    pub fn level(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            transform: PriceTransform::Level,
        }
    }

    pub fn rate_series(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            transform: PriceTransform::MonthOverMonthPercent,
        }
    }
}

/// Listing entry for a persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub symbol: String,
    pub name: String,
    pub points: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> InstrumentRecord {
        InstrumentRecord {
            dates: vec![
                "2024-01-02".to_string(),
                "2024-01-03".to_string(),
                "2024-01-04".to_string(),
            ],
            prices: vec![None, Some(2.0), Some(-0.98)],
            colors: vec![TrendColor::Black, TrendColor::Red, TrendColor::Red],
            name: "Consumer Prices".to_string(),
        }
    }

    #[test]
    fn test_record_serializes_flat_keys() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(json["dates"][0], "2024-01-02");
        assert!(json["prices"][0].is_null());
        assert_eq!(json["prices"][1], 2.0);
        assert_eq!(json["colors"][1], "red");
        assert_eq!(json["name"], "Consumer Prices");
    }

    #[test]
    fn test_record_deserializes_null_prices() {
        let json = r#"{"dates":["2024-01-02"],"prices":[null],"colors":["black"],"name":"X"}"#;
        let record: InstrumentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.prices, vec![None]);
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_to_series_and_flags() {
        let (series, flags) = sample_record().to_series_and_flags();
        assert_eq!(series.len(), 3);
        assert!(series[0].close.is_nan());
        assert_eq!(series[1].close, 2.0);
        assert_eq!(flags, vec![false, true, true]);
    }

    #[test]
    fn test_to_series_skips_bad_dates() {
        let mut record = sample_record();
        record.dates[1] = "not-a-date".to_string();
        let (series, flags) = record.to_series_and_flags();
        assert_eq!(series.len(), 2);
        assert_eq!(flags, vec![false, true]);
    }

    #[test]
    fn test_instrument_spec_constructors() {
        assert_eq!(InstrumentSpec::level("AAPL").transform, PriceTransform::Level);
        assert_eq!(
            InstrumentSpec::rate_series("CPI").transform,
            PriceTransform::MonthOverMonthPercent
        );
    }
}
