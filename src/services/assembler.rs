//! Builds the persisted chart record for one instrument.

use crate::error::SignalError;
use crate::types::{InstrumentRecord, PricePoint, PriceTransform, TrendColor};

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage change between consecutive closes; the first point has none.
fn month_over_month(series: &[PricePoint]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(series.len());
    for (i, point) in series.iter().enumerate() {
        if i == 0 {
            out.push(None);
            continue;
        }
        let prev = series[i - 1].close;
        let change = if point.is_valid() && prev.is_finite() && prev != 0.0 {
            Some(round2(100.0 * (point.close - prev) / prev))
        } else {
            None
        };
        out.push(change);
    }
    out
}

/// Package a series and its flags into an [`InstrumentRecord`].
pub fn assemble(
    name: &str,
    series: &[PricePoint],
    flags: &[bool],
    transform: PriceTransform,
) -> Result<InstrumentRecord, SignalError> {
    if series.len() != flags.len() {
        return Err(SignalError::LengthMismatch {
            series: series.len(),
            flags: flags.len(),
        });
    }

    let dates = series
        .iter()
        .map(|p| p.date.format("%Y-%m-%d").to_string())
        .collect();

    let prices = match transform {
        PriceTransform::Level => series
            .iter()
            .map(|p| p.is_valid().then_some(p.close))
            .collect(),
        PriceTransform::MonthOverMonthPercent => month_over_month(series),
    };

    let colors = flags.iter().map(|&f| TrendColor::from_flag(f)).collect();

    Ok(InstrumentRecord {
        dates,
        prices,
        colors,
        name: name.to_string(),
    })
}
