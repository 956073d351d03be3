use crate::error::{AppError, Result};
use crate::services::{build_segments, window_record, window_series};
use crate::types::{InstrumentRecord, PeriodSelector, RecordSummary, Segment};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// API response wrapper matching frontend expectations
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// One of "3m", "6m", "1y", "5y", "all".
    pub period: Option<String>,
}

impl PeriodQuery {
    fn selector(&self) -> Result<PeriodSelector> {
        match self.period.as_deref() {
            None => Ok(PeriodSelector::All),
            Some(s) => PeriodSelector::from_str(s)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown period: {}", s))),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentsResponse {
    pub symbol: String,
    pub name: String,
    pub period: PeriodSelector,
    pub segments: Vec<Segment>,
}

/// GET /api/records
async fn list_records(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<RecordSummary>>>> {
    let summaries = state.store.summaries()?;
    Ok(Json(ApiResponse { data: summaries }))
}

/// GET /api/records/:symbol?period=
async fn get_record(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ApiResponse<InstrumentRecord>>> {
    let selector = query.selector()?;
    let record = state.store.load(&symbol)?;
    Ok(Json(ApiResponse {
        data: window_record(&record, selector),
    }))
}

/// GET /api/records/:symbol/segments?period=
async fn get_segments(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ApiResponse<SegmentsResponse>>> {
    let selector = query.selector()?;
    let record = state.store.load(&symbol)?;

    let (series, flags) = record.to_series_and_flags();
    let tail = window_series(&series, selector);
    let offset = series.len() - tail.len();
    let segments = build_segments(tail, &flags[offset..])?;

    Ok(Json(ApiResponse {
        data: SegmentsResponse {
            symbol,
            name: record.name,
            period: selector,
            segments,
        },
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_records))
        .route("/:symbol", get(get_record))
        .route("/:symbol/segments", get(get_segments))
}
