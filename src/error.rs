use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure to obtain a price history for one instrument.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The provider answered but had no rows for the symbol.
    #[error("No data for {0}")]
    NoData(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    /// Whether the failure is an empty history rather than a provider fault.
    pub fn is_no_data(&self) -> bool {
        matches!(self, FetchError::NoData(_))
    }
}

/// Violated precondition of the signal pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    #[error("Invalid moving average windows: short={short}, long={long}")]
    InvalidWindows { short: usize, long: usize },

    #[error("Length mismatch: {series} points but {flags} flags")]
    LengthMismatch { series: usize, flags: usize },
}

/// Record persistence failure.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Signal(#[from] SignalError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Signal(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Store(StoreError::NotFound(symbol)) => {
                (StatusCode::NOT_FOUND, format!("No record for {}", symbol))
            }
            AppError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Anyhow(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_no_data() {
        assert!(FetchError::NoData("AAPL".to_string()).is_no_data());
        assert!(!FetchError::Provider("boom".to_string()).is_no_data());
    }

    #[test]
    fn test_signal_error_display() {
        let err = SignalError::InvalidWindows { short: 0, long: 10 };
        assert_eq!(
            err.to_string(),
            "Invalid moving average windows: short=0, long=10"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        let resp = AppError::NotFound("x".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = AppError::BadRequest("x".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::Store(StoreError::NotFound("AAPL".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
