//! Trailing-period windowing of chart series.
//!
//! A window is anchored at the last date of the series and reaches back a whole
//! number of calendar months: `[end - N months, end]`, both ends inclusive.
//! When the anchor's day of month does not exist in the target month the start
//! moves to the first day of the following month, so a three month window
//! ending 2020-12-31 starts on 2020-10-01 while one ending 2021-06-30 starts on
//! 2021-03-30.
//!
//! The same rule is implemented in the dashboard's JavaScript (see
//! `render::dashboard`).

use crate::types::{InstrumentRecord, PeriodSelector, PricePoint, TrendColor};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Parallel date/price/color arrays cut down to a trailing period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowedSeries {
    pub dates: Vec<String>,
    pub prices: Vec<Option<f64>>,
    pub colors: Vec<TrendColor>,
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// First calendar day inside the window ending at `end`.
///
/// Returns None when the selector keeps the whole history or the subtraction
/// leaves chrono's date range.
pub fn window_start_date(end: NaiveDate, selector: PeriodSelector) -> Option<NaiveDate> {
    let months = selector.months()?;
    let shifted = end.checked_sub_months(Months::new(months))?;
    if shifted.day() == end.day() {
        Some(shifted)
    } else {
        // Clamped to a shorter month's last day.
        shifted.succ_opt()
    }
}

/// Index of the first element inside the window.
///
/// Falls back to 0 (the whole series) when the anchor is missing or no element
/// qualifies.
fn first_index<T>(
    items: &[T],
    date_of: impl Fn(&T) -> Option<NaiveDate>,
    selector: PeriodSelector,
) -> usize {
    let Some(end) = items.last().and_then(&date_of) else {
        return 0;
    };
    let Some(start) = window_start_date(end, selector) else {
        return 0;
    };

    // Sorted ascending, so everything inside the window is a suffix.
    let idx = items.partition_point(|item| date_of(item).map_or(true, |d| d < start));
    if idx >= items.len() {
        0
    } else {
        idx
    }
}

/// Position of the first ISO date string inside the window.
pub fn window_start_index(dates: &[String], selector: PeriodSelector) -> usize {
    first_index(dates, |d| parse_date(d), selector)
}

/// Slice parallel date/price/color arrays down to the trailing period.
pub fn window(
    dates: &[String],
    prices: &[Option<f64>],
    colors: &[TrendColor],
    selector: PeriodSelector,
) -> WindowedSeries {
    let start = window_start_index(dates, selector);
    WindowedSeries {
        dates: dates.get(start..).unwrap_or_default().to_vec(),
        prices: prices.get(start..).unwrap_or_default().to_vec(),
        colors: colors.get(start..).unwrap_or_default().to_vec(),
    }
}

/// Window a whole record, keeping its name.
pub fn window_record(record: &InstrumentRecord, selector: PeriodSelector) -> InstrumentRecord {
    let windowed = window(&record.dates, &record.prices, &record.colors, selector);
    InstrumentRecord {
        dates: windowed.dates,
        prices: windowed.prices,
        colors: windowed.colors,
        name: record.name.clone(),
    }
}

/// Window a typed price series.
pub fn window_series(series: &[PricePoint], selector: PeriodSelector) -> &[PricePoint] {
    let start = first_index(series, |p| Some(p.date), selector);
    &series[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn daily_dates(from: NaiveDate, to: NaiveDate) -> Vec<String> {
        let mut out = Vec::new();
        let mut d = from;
        while d <= to {
            out.push(d.format("%Y-%m-%d").to_string());
            d += Duration::days(1);
        }
        out
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parallel(dates: &[String]) -> (Vec<Option<f64>>, Vec<TrendColor>) {
        let prices = (0..dates.len()).map(|i| Some(i as f64)).collect();
        let colors = (0..dates.len())
            .map(|i| TrendColor::from_flag(i % 3 == 0))
            .collect();
        (prices, colors)
    }

    // =========================================================================
    // Start Date Tests
    // =========================================================================

    #[test]
    fn test_start_date_clamps_month_end() {
        assert_eq!(
            window_start_date(ymd(2020, 12, 31), PeriodSelector::ThreeMonths),
            Some(ymd(2020, 10, 1))
        );
        // May 31 minus 3 months clamps to Feb 29 in a leap year.
        assert_eq!(
            window_start_date(ymd(2020, 5, 31), PeriodSelector::ThreeMonths),
            Some(ymd(2020, 3, 1))
        );
    }

    #[test]
    fn test_start_date_leap_day_years() {
        assert_eq!(
            window_start_date(ymd(2024, 2, 29), PeriodSelector::OneYear),
            Some(ymd(2023, 3, 1))
        );
        assert_eq!(
            window_start_date(ymd(2024, 2, 29), PeriodSelector::FiveYears),
            Some(ymd(2019, 3, 1))
        );
        assert_eq!(
            window_start_date(ymd(2021, 8, 31), PeriodSelector::SixMonths),
            Some(ymd(2021, 3, 1))
        );
    }

    #[test]
    fn test_start_date_keeps_existing_day() {
        assert_eq!(
            window_start_date(ymd(2021, 6, 30), PeriodSelector::ThreeMonths),
            Some(ymd(2021, 3, 30))
        );
        assert_eq!(
            window_start_date(ymd(2021, 2, 28), PeriodSelector::FiveYears),
            Some(ymd(2016, 2, 28))
        );
        assert_eq!(
            window_start_date(ymd(2020, 1, 15), PeriodSelector::OneYear),
            Some(ymd(2019, 1, 15))
        );
    }

    #[test]
    fn test_start_date_all_is_none() {
        assert_eq!(window_start_date(ymd(2020, 1, 1), PeriodSelector::All), None);
    }

    // =========================================================================
    // Window Tests
    // =========================================================================

    #[test]
    fn test_three_month_window_anchoring() {
        let dates = daily_dates(ymd(2020, 1, 1), ymd(2020, 12, 31));
        let (prices, colors) = parallel(&dates);
        let w = window(&dates, &prices, &colors, PeriodSelector::ThreeMonths);

        assert_eq!(w.dates.first().map(String::as_str), Some("2020-10-01"));
        assert_eq!(w.dates.last().map(String::as_str), Some("2020-12-31"));
        assert_eq!(w.dates.len(), 92);
        assert_eq!(w.prices.len(), w.dates.len());
        assert_eq!(w.colors.len(), w.dates.len());
        assert_eq!(w.prices[0], prices[dates.len() - 92]);
    }

    #[test]
    fn test_short_history_falls_back_to_everything() {
        let dates = daily_dates(ymd(2023, 4, 1), ymd(2023, 5, 31));
        let (prices, colors) = parallel(&dates);
        let w = window(&dates, &prices, &colors, PeriodSelector::OneYear);

        assert_eq!(w.dates, dates);
        assert_eq!(w.prices, prices);
        assert_eq!(w.colors, colors);
    }

    #[test]
    fn test_all_keeps_everything() {
        let dates = daily_dates(ymd(2000, 1, 1), ymd(2010, 1, 1));
        let (prices, colors) = parallel(&dates);
        let w = window(&dates, &prices, &colors, PeriodSelector::All);
        assert_eq!(w.dates.len(), dates.len());
    }

    #[test]
    fn test_empty_input() {
        let w = window(&[], &[], &[], PeriodSelector::SixMonths);
        assert!(w.dates.is_empty());
        assert!(w.prices.is_empty());
        assert!(w.colors.is_empty());
    }

    #[test]
    fn test_window_with_trading_day_gaps() {
        let dates: Vec<String> = ["2021-01-04", "2021-03-31", "2021-04-01", "2021-06-30"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let (prices, colors) = parallel(&dates);
        let w = window(&dates, &prices, &colors, PeriodSelector::ThreeMonths);
        // 2021-06-30 minus three months is 2021-03-30.
        assert_eq!(w.dates, vec!["2021-03-31", "2021-04-01", "2021-06-30"]);
    }

    #[test]
    fn test_boundary_date_is_inside_the_window() {
        let dates: Vec<String> = ["2021-03-29", "2021-03-30", "2021-06-30"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let (prices, colors) = parallel(&dates);
        let w = window(&dates, &prices, &colors, PeriodSelector::ThreeMonths);
        assert_eq!(w.dates, vec!["2021-03-30", "2021-06-30"]);
        assert_eq!(w.prices, prices[1..].to_vec());
    }

    #[test]
    fn test_unparseable_anchor_keeps_everything() {
        let dates = vec!["2021-01-04".to_string(), "garbage".to_string()];
        let (prices, colors) = parallel(&dates);
        let w = window(&dates, &prices, &colors, PeriodSelector::ThreeMonths);
        assert_eq!(w.dates.len(), 2);
    }

    #[test]
    fn test_window_is_idempotent() {
        let dates = daily_dates(ymd(2015, 6, 15), ymd(2021, 2, 28));
        let (prices, colors) = parallel(&dates);
        let first = window(&dates, &prices, &colors, PeriodSelector::FiveYears);
        let second = window(&dates, &prices, &colors, PeriodSelector::FiveYears);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first.dates.first().map(String::as_str), Some("2016-02-28"));
    }

    #[test]
    fn test_window_record_keeps_name() {
        let dates = daily_dates(ymd(2020, 1, 1), ymd(2020, 12, 31));
        let (prices, colors) = parallel(&dates);
        let record = InstrumentRecord {
            dates,
            prices,
            colors,
            name: "Index".to_string(),
        };
        let windowed = window_record(&record, PeriodSelector::SixMonths);
        assert_eq!(windowed.name, "Index");
        assert_eq!(windowed.dates[0], "2020-07-01");
    }

    #[test]
    fn test_window_series() {
        let series: Vec<PricePoint> = (0..400)
            .map(|i| PricePoint::new(ymd(2019, 1, 1) + Duration::days(i), 1.0))
            .collect();
        let tail = window_series(&series, PeriodSelector::OneYear);
        // 2020-02-04 minus one year is 2019-02-04.
        assert_eq!(series.last().unwrap().date, ymd(2020, 2, 4));
        assert_eq!(tail[0].date, ymd(2019, 2, 4));
        assert_eq!(tail.last(), series.last());
    }
}
