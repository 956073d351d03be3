//! HTML page rendering.
//!
//! Pages are self-contained apart from the Plotly script, which is loaded from
//! its CDN. Record data is embedded as JSON literals.

pub mod dashboard;
pub mod segment_chart;

pub use dashboard::render_dashboard;
pub use segment_chart::{render_segment_chart, segment_traces, SegmentTrace};

use crate::services::RecordStore;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

pub(crate) const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Escape text for use inside HTML element content or attribute values.
pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize a value as a JSON literal that is safe inside a `<script>` block.
pub(crate) fn script_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Write `index.html` and one static chart per record into `site_dir`.
///
/// Returns the number of instrument pages written.
pub fn write_site(store: &RecordStore, site_dir: &Path) -> anyhow::Result<usize> {
    let records = store.load_all()?;
    let charts_dir = site_dir.join("charts");
    fs::create_dir_all(&charts_dir)?;

    fs::write(site_dir.join("index.html"), render_dashboard(&records)?)?;

    for (symbol, record) in &records {
        let page = render_segment_chart(symbol, record)?;
        let file = format!("{}.html", RecordStore::file_stem(symbol));
        fs::write(charts_dir.join(file), page)?;
    }

    info!("Rendered {} instruments into {:?}", records.len(), site_dir);
    Ok(records.len())
}
