//! Static multi-trace chart: one independent line per same-flag segment.

use super::{escape_html, script_json, PLOTLY_SRC};
use crate::services::{build_segments, window_series};
use crate::types::{InstrumentRecord, PeriodSelector, Segment};
use serde::Serialize;

/// Default trailing period of the static chart.
pub const STATIC_CHART_PERIOD: PeriodSelector = PeriodSelector::FiveYears;

/// One Plotly scatter trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentTrace {
    pub x: Vec<String>,
    /// Malformed closes serialize as null and render as gaps.
    pub y: Vec<f64>,
    pub mode: &'static str,
    pub line: TraceLine,
    pub showlegend: bool,
    pub hoverinfo: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceLine {
    pub color: &'static str,
    pub width: f64,
}

fn trace_for(segment: &Segment) -> SegmentTrace {
    SegmentTrace {
        x: segment
            .points
            .iter()
            .map(|p| p.date.format("%Y-%m-%d").to_string())
            .collect(),
        y: segment.points.iter().map(|p| p.close).collect(),
        mode: "lines",
        line: TraceLine {
            color: segment.color().as_str(),
            width: 1.5,
        },
        showlegend: false,
        hoverinfo: "x+y",
    }
}

/// Traces for a record, trimmed to `period`.
///
/// Segments are rebuilt from the record's colors after windowing, so a run that
/// started before the window opens as its own segment.
pub fn segment_traces(record: &InstrumentRecord, period: PeriodSelector) -> Vec<SegmentTrace> {
    let (series, flags) = record.to_series_and_flags();
    let tail = window_series(&series, period);
    let offset = series.len() - tail.len();

    match build_segments(tail, &flags[offset..]) {
        Ok(segments) => segments.iter().map(trace_for).collect(),
        Err(_) => Vec::new(),
    }
}

/// Render the static segment chart page for one instrument.
pub fn render_segment_chart(symbol: &str, record: &InstrumentRecord) -> serde_json::Result<String> {
    let traces = segment_traces(record, STATIC_CHART_PERIOD);
    let layout = serde_json::json!({
        "title": format!("{} ({})", record.name, symbol),
        "xaxis": {"title": "Date", "type": "date"},
        "yaxis": {"title": "Close"},
        "template": "plotly_white",
    });

    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str(&format!("<title>{}</title>\n", escape_html(&record.name)));
    page.push_str(&format!("<script src=\"{}\"></script>\n", PLOTLY_SRC));
    page.push_str("</head>\n<body>\n");
    page.push_str("<p><a href=\"../index.html\">&larr; All instruments</a></p>\n");
    page.push_str("<div id=\"chart\" style=\"height:80vh\"></div>\n");
    page.push_str("<script>\n");
    page.push_str(&format!(
        "Plotly.newPlot(\"chart\", {}, {}, {{ responsive: true }});\n",
        script_json(&traces)?,
        script_json(&layout)?
    ));
    page.push_str("</script>\n</body>\n</html>\n");

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrendColor;
    use chrono::{Duration, NaiveDate};

    fn record_spanning(days: i64, end: NaiveDate) -> InstrumentRecord {
        let start = end - Duration::days(days - 1);
        let dates: Vec<String> = (0..days)
            .map(|i| (start + Duration::days(i)).format("%Y-%m-%d").to_string())
            .collect();
        let n = dates.len();
        InstrumentRecord {
            prices: (0..n).map(|i| Some(100.0 + i as f64)).collect(),
            colors: (0..n).map(|i| TrendColor::from_flag((i / 10) % 2 == 1)).collect(),
            dates,
            name: "Widget".to_string(),
        }
    }

    #[test]
    fn test_segment_traces_alternate_colors() {
        let record = record_spanning(35, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        let traces = segment_traces(&record, PeriodSelector::All);

        let colors: Vec<&str> = traces.iter().map(|t| t.line.color).collect();
        assert_eq!(colors, vec!["black", "red", "black", "red"]);
        assert_eq!(traces.iter().map(|t| t.x.len()).sum::<usize>(), 35);
    }

    #[test]
    fn test_static_chart_is_trimmed_to_five_years() {
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let record = record_spanning(4000, end);
        let traces = segment_traces(&record, STATIC_CHART_PERIOD);

        assert_eq!(traces[0].x[0], "2019-06-30");
        assert_eq!(traces.last().unwrap().x.last().unwrap(), "2024-06-30");
    }

    #[test]
    fn test_null_prices_become_null_in_json() {
        let mut record = record_spanning(3, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        record.prices[1] = None;
        let traces = segment_traces(&record, PeriodSelector::All);
        let json = serde_json::to_string(&traces).unwrap();
        assert!(json.contains("[100.0,null,102.0]"));
    }

    #[test]
    fn test_render_segment_chart_page() {
        let record = record_spanning(30, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        let page = render_segment_chart("WID", &record).unwrap();

        assert!(page.contains("<title>Widget</title>"));
        assert!(page.contains("Plotly.newPlot(\"chart\""));
        assert_eq!(page.matches("\"mode\":\"lines\"").count(), 3);
    }
}
