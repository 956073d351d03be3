//! Trendline - moving-average trend segmentation and period-filterable price charts

pub mod api;
pub mod config;
pub mod error;
pub mod render;
pub mod services;
pub mod sources;
pub mod types;

use config::Config;
use services::RecordStore;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<RecordStore>,
}

// Re-export commonly used types
pub use types::*;
pub use services::{
    assemble, build_segments, compute_flags, window, window_record, MovingAverageSignal,
};
