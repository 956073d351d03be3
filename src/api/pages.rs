use crate::error::{AppError, Result};
use crate::render::{render_dashboard, render_segment_chart};
use crate::services::RecordStore;
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::Html,
    routing::get,
    Router,
};

/// GET /
async fn dashboard(State(state): State<AppState>) -> Result<Html<String>> {
    let records = state.store.load_all()?;
    let page = render_dashboard(&records).map_err(anyhow::Error::from)?;
    Ok(Html(page))
}

/// GET /charts/:page
///
/// `page` is a record file stem, with or without `.html`, so the dashboard's
/// relative links work when served from here.
async fn segment_chart(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> Result<Html<String>> {
    let stem = page.strip_suffix(".html").unwrap_or(&page);
    let symbol = RecordStore::symbol_from_stem(stem)
        .ok_or_else(|| AppError::NotFound(format!("No chart page {}", page)))?;
    let record = state.store.load(&symbol)?;
    let html = render_segment_chart(&symbol, &record).map_err(anyhow::Error::from)?;
    Ok(Html(html))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/charts/:page", get(segment_chart))
}
