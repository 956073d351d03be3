pub mod health;
pub mod pages;
pub mod records;

use crate::AppState;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(pages::router())
        .nest("/api/records", records::router())
}

/// Full application with middleware and state attached.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
