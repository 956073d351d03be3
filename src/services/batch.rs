//! Batch pipeline: fetch, signal, assemble and persist each instrument.
//!
//! Instruments are independent. A failure only drops the instrument it belongs
//! to; the batch always runs to the end.

use super::{assemble, MovingAverageSignal, RecordStore};
use crate::error::FetchError;
use crate::sources::PriceSource;
use crate::types::{InstrumentRecord, InstrumentSpec};
use chrono::NaiveDate;
use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Why an instrument produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum SkipReason {
    NoData,
    FetchFailed(String),
    Pipeline(String),
    StoreFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedInstrument {
    pub symbol: String,
    pub reason: SkipReason,
}

/// Outcome of one batch pass, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub written: Vec<String>,
    pub skipped: Vec<SkippedInstrument>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Drives the per-instrument pipeline against a price source.
pub struct BatchRunner<S: PriceSource> {
    source: Arc<S>,
    store: Arc<RecordStore>,
    signal: MovingAverageSignal,
    start: NaiveDate,
    concurrency: usize,
}

impl<S: PriceSource> BatchRunner<S> {
    pub fn new(
        source: Arc<S>,
        store: Arc<RecordStore>,
        signal: MovingAverageSignal,
        start: NaiveDate,
    ) -> Self {
        Self {
            source,
            store,
            signal,
            start,
            concurrency: 1,
        }
    }

    /// Allow up to `n` instruments in flight at once.
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// Fetch and build the record for one instrument without persisting it.
    pub async fn build_record(&self, spec: &InstrumentSpec) -> Result<InstrumentRecord, SkipReason> {
        let series = self
            .source
            .fetch(&spec.symbol, self.start)
            .await
            .map_err(|e| match e {
                FetchError::NoData(_) => SkipReason::NoData,
                other => SkipReason::FetchFailed(other.to_string()),
            })?;

        if series.is_empty() {
            return Err(SkipReason::NoData);
        }

        let name = self.source.display_name(&spec.symbol).await;
        let flags = self.signal.compute_flags(&series);
        assemble(&name, &series, &flags, spec.transform)
            .map_err(|e| SkipReason::Pipeline(e.to_string()))
    }

    async fn process(&self, spec: &InstrumentSpec) -> Result<(), SkipReason> {
        info!("Downloading {}", spec.symbol);
        let record = self.build_record(spec).await?;
        self.store
            .save(&spec.symbol, &record)
            .map_err(|e| SkipReason::StoreFailed(e.to_string()))?;
        info!("Saved {} ({} points)", spec.symbol, record.len());
        Ok(())
    }

    /// Run every instrument and report what was written and what was skipped.
    pub async fn run(&self, instruments: &[InstrumentSpec]) -> BatchReport {
        let mut outcomes: Vec<(usize, Result<(), SkipReason>)> = stream::iter(instruments.iter().enumerate())
            .map(|(idx, spec)| async move { (idx, self.process(spec).await) })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;
        outcomes.sort_by_key(|(idx, _)| *idx);

        let mut report = BatchReport::default();
        for (idx, outcome) in outcomes {
            let symbol = instruments[idx].symbol.clone();
            match outcome {
                Ok(()) => report.written.push(symbol),
                Err(reason) => {
                    match &reason {
                        SkipReason::NoData => info!("No data for {}, skipping", symbol),
                        other => warn!("Skipping {}: {:?}", symbol, other),
                    }
                    report.skipped.push(SkippedInstrument { symbol, reason });
                }
            }
        }

        info!(
            "Batch finished: {} written, {} skipped",
            report.written.len(),
            report.skipped.len()
        );
        report
    }
}
