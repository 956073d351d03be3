//! Interactive dashboard: one single-trace chart per instrument with a
//! trailing-period selector.

use super::{escape_html, script_json, PLOTLY_SRC};
use crate::types::{InstrumentRecord, PeriodSelector};
use std::collections::BTreeMap;

/// Client-side period window, kept in step with `services::window`.
const WINDOW_JS: &str = r#"
const PERIOD_MONTHS = { "3m": 3, "6m": 6, "1y": 12, "5y": 60, "all": null };

function daysInMonth(year, month) {
  return new Date(Date.UTC(year, month, 0)).getUTCDate();
}

function windowStart(endIso, months) {
  const [y, m, d] = endIso.split("-").map(Number);
  const total = y * 12 + (m - 1) - months;
  const year = Math.floor(total / 12);
  const month = total - year * 12 + 1;
  const day = Math.min(d, daysInMonth(year, month));
  const start = new Date(Date.UTC(year, month - 1, day));
  if (day < d) start.setUTCDate(day + 1);
  return start.toISOString().slice(0, 10);
}

function windowSeries(dates, prices, colors, period) {
  const months = PERIOD_MONTHS[period];
  let idx = 0;
  if (dates.length > 0 && months != null) {
    const start = windowStart(dates[dates.length - 1], months);
    let lo = 0, hi = dates.length;
    while (lo < hi) {
      const mid = (lo + hi) >> 1;
      if (dates[mid] < start) lo = mid + 1; else hi = mid;
    }
    idx = lo < dates.length ? lo : 0;
  }
  return { dates: dates.slice(idx), prices: prices.slice(idx), colors: colors.slice(idx) };
}
"#;

const DRAW_JS: &str = r##"
function draw(symbol, period) {
  const rec = RECORDS[symbol];
  const w = windowSeries(rec.dates, rec.prices, rec.colors, period);
  const trace = {
    x: w.dates,
    y: w.prices,
    mode: "lines+markers",
    line: { color: "#9e9e9e", width: 1 },
    marker: { color: w.colors, size: 3 },
    connectgaps: false,
    hovertemplate: "%{x}<br>%{y}<extra></extra>",
  };
  const layout = {
    margin: { t: 10, r: 10, b: 40, l: 60 },
    template: "plotly_white",
    xaxis: { type: "date" },
  };
  Plotly.react("chart-" + symbol, [trace], layout, { responsive: true });
  document.querySelectorAll('[data-symbol="' + symbol + '"] button').forEach((b) => {
    b.classList.toggle("active", b.dataset.period === period);
  });
}

document.querySelectorAll(".periods").forEach((group) => {
  const symbol = group.dataset.symbol;
  group.querySelectorAll("button").forEach((button) => {
    button.addEventListener("click", () => draw(symbol, button.dataset.period));
  });
  draw(symbol, DEFAULT_PERIOD);
});
"##;

const STYLE: &str = r#"
body { font-family: -apple-system, Segoe UI, Helvetica, Arial, sans-serif; margin: 24px; color: #222; }
.card { border: 1px solid #ddd; border-radius: 6px; padding: 12px 16px; margin-bottom: 24px; }
.card h2 { font-size: 18px; margin: 0 0 8px 0; }
.card h2 a { color: inherit; text-decoration: none; }
.periods button { border: 1px solid #bbb; background: #fff; padding: 2px 10px; margin-right: 4px; cursor: pointer; }
.periods button.active { background: #222; color: #fff; border-color: #222; }
.chart { height: 360px; }
.legend { font-size: 12px; color: #666; }
.legend .red { color: #d32f2f; }
"#;

fn period_buttons(symbol: &str) -> String {
    let mut html = format!(
        r#"<div class="periods" data-symbol="{}">"#,
        escape_html(symbol)
    );
    for period in PeriodSelector::ALL {
        html.push_str(&format!(
            r#"<button type="button" data-period="{}">{}</button>"#,
            period.as_str(),
            period.label()
        ));
    }
    html.push_str("</div>");
    html
}

/// Render the dashboard for `(symbol, record)` pairs, in the given order.
pub fn render_dashboard(records: &[(String, InstrumentRecord)]) -> serde_json::Result<String> {
    let by_symbol: BTreeMap<&str, &InstrumentRecord> =
        records.iter().map(|(s, r)| (s.as_str(), r)).collect();

    let mut cards = String::new();
    for (symbol, record) in records {
        let sym = escape_html(symbol);
        cards.push_str(&format!(
            r#"<section class="card"><h2><a href="charts/{file}.html">{name}</a> <small>{sym}</small></h2>{buttons}<div id="chart-{sym}" class="chart"></div></section>"#,
            file = escape_html(&crate::services::RecordStore::file_stem(symbol)),
            name = escape_html(&record.name),
            sym = sym,
            buttons = period_buttons(symbol),
        ));
        cards.push('\n');
    }

    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str("<title>Trend dashboard</title>\n");
    page.push_str(&format!("<script src=\"{}\"></script>\n", PLOTLY_SRC));
    page.push_str("<style>");
    page.push_str(STYLE);
    page.push_str("</style>\n</head>\n<body>\n");
    page.push_str("<h1>Trend dashboard</h1>\n");
    page.push_str(
        "<p class=\"legend\"><span class=\"red\">&#9679;</span> short average below long average</p>\n",
    );
    if records.is_empty() {
        page.push_str("<p>No instruments available.</p>\n");
    }
    page.push_str(&cards);
    page.push_str("<script>\n");
    page.push_str(&format!("const RECORDS = {};\n", script_json(&by_symbol)?));
    page.push_str(&format!(
        "const DEFAULT_PERIOD = {};\n",
        script_json(&PeriodSelector::All)?
    ));
    page.push_str(WINDOW_JS);
    page.push_str(DRAW_JS);
    page.push_str("</script>\n</body>\n</html>\n");

    Ok(page)
}
