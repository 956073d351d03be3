use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// Persisted instrument records available to the dashboard.
    records: usize,
    signal: SignalWindows,
}

/// Moving-average windows the records were configured with.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignalWindows {
    short_window: usize,
    long_window: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let records = state.store.symbols().map(|s| s.len()).unwrap_or(0);
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        records,
        signal: SignalWindows {
            short_window: state.config.short_window,
            long_window: state.config.long_window,
        },
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}
