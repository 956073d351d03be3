pub mod assembler;
pub mod batch;
pub mod record_store;
pub mod segments;
pub mod signal;
pub mod window;

pub use assembler::assemble;
pub use batch::{BatchReport, BatchRunner, SkipReason, SkippedInstrument};
pub use record_store::RecordStore;
pub use segments::build_segments;
pub use signal::{compute_flags, MovingAverageSignal};
pub use window::{window, window_record, window_series, window_start_date, WindowedSeries};
