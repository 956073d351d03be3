//! Property tests for the signal, segment and window invariants

use chrono::{Datelike, Duration, Months, NaiveDate};
use proptest::collection::vec;
use proptest::prelude::*;
use trendline::services::{window_series, window_start_date};
use trendline::types::*;
use trendline::{build_segments, compute_flags, window};

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
}

fn daily(closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PricePoint::new(base() + Duration::days(i as i64), c))
        .collect()
}

/// Series with strictly increasing dates separated by `gaps` days.
fn with_gaps(gaps: &[i64], offset: i64) -> Vec<PricePoint> {
    let mut date = base() + Duration::days(offset);
    gaps.iter()
        .enumerate()
        .map(|(i, &gap)| {
            date += Duration::days(gap);
            PricePoint::new(date, 100.0 + i as f64)
        })
        .collect()
}

fn selector() -> impl Strategy<Value = PeriodSelector> {
    prop::sample::select(PeriodSelector::ALL.to_vec())
}

fn window_pair() -> impl Strategy<Value = (usize, usize)> {
    (1usize..30).prop_flat_map(|short| (Just(short), short..80))
}

// ===== Segment Properties =====

proptest! {
    #[test]
    fn segments_cover_the_series_and_are_maximal(flags in vec(any::<bool>(), 0..300)) {
        let closes: Vec<f64> = (0..flags.len()).map(|i| i as f64).collect();
        let series = daily(&closes);
        let segments = build_segments(&series, &flags).unwrap();

        let rebuilt: Vec<PricePoint> = segments.iter().flat_map(|s| s.points.iter().copied()).collect();
        prop_assert_eq!(rebuilt, series);
        prop_assert!(segments.iter().all(|s| !s.is_empty()));
        prop_assert!(segments.windows(2).all(|w| w[0].flag != w[1].flag));

        let rebuilt_flags: Vec<bool> = segments
            .iter()
            .flat_map(|s| std::iter::repeat(s.flag).take(s.len()))
            .collect();
        prop_assert_eq!(rebuilt_flags, flags);
    }
}

// ===== Signal Properties =====

proptest! {
    #[test]
    fn flags_are_false_before_a_full_long_window(
        closes in vec(-1.0e6f64..1.0e6, 0..200),
        (short, long) in window_pair()
    ) {
        let flags = compute_flags(&daily(&closes), short, long).unwrap();
        prop_assert_eq!(flags.len(), closes.len());

        let floor = (long - 1).min(flags.len());
        prop_assert!(flags[..floor].iter().all(|f| !f));
    }

    #[test]
    fn constant_tail_is_never_bearish(
        prefix in vec(0.01f64..5000.0, 0..200),
        level in 0.001f64..5000.0,
        (short, long) in window_pair()
    ) {
        let mut closes = prefix.clone();
        closes.extend(std::iter::repeat(level).take(long + 20));
        let flags = compute_flags(&daily(&closes), short, long).unwrap();

        let settled = prefix.len() + long - 1;
        prop_assert!(flags[settled..].iter().all(|f| !f));
    }
}

// ===== Window Properties =====

proptest! {
    #[test]
    fn window_is_an_aligned_repeatable_suffix(
        gaps in vec(1i64..6, 0..600),
        offset in 0i64..9000,
        period in selector()
    ) {
        let series = with_gaps(&gaps, offset);
        let dates: Vec<String> = series.iter().map(|p| p.date.format("%Y-%m-%d").to_string()).collect();
        let prices: Vec<Option<f64>> = series.iter().map(|p| Some(p.close)).collect();
        let colors: Vec<TrendColor> = (0..series.len()).map(|i| TrendColor::from_flag(i % 4 == 0)).collect();

        let w = window(&dates, &prices, &colors, period);
        prop_assert_eq!(w.prices.len(), w.dates.len());
        prop_assert_eq!(w.colors.len(), w.dates.len());

        let cut = dates.len() - w.dates.len();
        prop_assert_eq!(&dates[cut..], w.dates.as_slice());
        prop_assert_eq!(&prices[cut..], w.prices.as_slice());
        prop_assert_eq!(&colors[cut..], w.colors.as_slice());
        prop_assert_eq!(window_series(&series, period).len(), w.dates.len());

        let again = window(&w.dates, &w.prices, &w.colors, period);
        prop_assert_eq!(again, w);
    }

    #[test]
    fn daily_window_opens_on_the_calendar_boundary(
        offset in 0i64..9000,
        len in 1usize..2200,
        period in selector()
    ) {
        let series: Vec<PricePoint> = (0..len)
            .map(|i| PricePoint::new(base() + Duration::days(offset + i as i64), 1.0))
            .collect();
        let end = series[len - 1].date;
        let tail = window_series(&series, period);

        match window_start_date(end, period) {
            Some(start) if start >= series[0].date => prop_assert_eq!(tail[0].date, start),
            _ => prop_assert_eq!(tail.len(), series.len()),
        }

        if let (Some(start), Some(months)) = (window_start_date(end, period), period.months()) {
            let shifted = end.checked_sub_months(Months::new(months)).unwrap();
            if shifted.day() == end.day() {
                prop_assert_eq!(start, shifted);
            } else {
                prop_assert_eq!(start.day(), 1);
                prop_assert_eq!(start, shifted + Duration::days(1));
            }
        }
    }
}
