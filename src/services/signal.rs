//! Moving-average crossover signal.

use crate::error::SignalError;
use crate::types::PricePoint;

/// Relative gap below which two averages count as equal.
const EQUALITY_TOLERANCE: f64 = 1e-9;

/// Trailing mean over a fixed window, advanced one point at a time.
///
/// Non-finite closes are counted instead of summed so that a window holding one
/// can be recognised without rescanning it. The running sum is compensated
/// (Neumaier) and rebuilt from the window contents once per window length, so
/// rounding error cannot accumulate across a long series.
struct RollingMean {
    window: usize,
    sum: f64,
    compensation: f64,
    invalid: usize,
    since_rebuild: usize,
}

impl RollingMean {
    fn new(window: usize) -> Self {
        Self {
            window,
            sum: 0.0,
            compensation: 0.0,
            invalid: 0,
            since_rebuild: 0,
        }
    }

    fn add(&mut self, value: f64) {
        let total = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - total) + value;
        } else {
            self.compensation += (value - total) + self.sum;
        }
        self.sum = total;
    }

    fn push(&mut self, value: f64) {
        if value.is_finite() {
            self.add(value);
        } else {
            self.invalid += 1;
        }
    }

    fn evict(&mut self, value: f64) {
        if value.is_finite() {
            self.add(-value);
        } else {
            self.invalid -= 1;
        }
    }

    fn rebuild(&mut self, values: &[f64]) {
        self.sum = 0.0;
        self.compensation = 0.0;
        self.invalid = 0;
        self.since_rebuild = 0;
        for &value in values {
            self.push(value);
        }
    }

    /// Slide the window so that it ends at `closes[i]`.
    fn advance(&mut self, closes: &[f64], i: usize) {
        self.push(closes[i]);
        if i >= self.window {
            self.evict(closes[i - self.window]);
        }

        self.since_rebuild += 1;
        if self.since_rebuild >= self.window && i + 1 >= self.window {
            self.rebuild(&closes[i + 1 - self.window..=i]);
        }
    }

    fn mean(&self) -> Option<f64> {
        if self.invalid > 0 {
            return None;
        }
        Some((self.sum + self.compensation) / self.window as f64)
    }
}

/// Strict `short < long`, treating averages within [`EQUALITY_TOLERANCE`] of
/// their own scale as equal.
fn is_below(avg_short: f64, avg_long: f64) -> bool {
    let scale = avg_short.abs().max(avg_long.abs());
    avg_long - avg_short > scale * EQUALITY_TOLERANCE
}

/// Bearish-cross detector comparing a short and a long simple moving average.
///
/// The flag for a day is `true` when the short average lies strictly below the
/// long one; equal averages, up to rounding noise, are `false`. Days without a
/// full long window, and windows that contain a malformed close, are always
/// `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovingAverageSignal {
    short_window: usize,
    long_window: usize,
}

impl MovingAverageSignal {
    /// 5-day vs 10-day averages.
    pub const FAST: MovingAverageSignal = MovingAverageSignal {
        short_window: 5,
        long_window: 10,
    };

    /// 20-day vs 60-day averages.
    pub const SLOW: MovingAverageSignal = MovingAverageSignal {
        short_window: 20,
        long_window: 60,
    };

    pub fn new(short_window: usize, long_window: usize) -> Result<Self, SignalError> {
        if short_window == 0 || long_window < short_window {
            return Err(SignalError::InvalidWindows {
                short: short_window,
                long: long_window,
            });
        }
        Ok(Self {
            short_window,
            long_window,
        })
    }

    pub fn short_window(&self) -> usize {
        self.short_window
    }

    pub fn long_window(&self) -> usize {
        self.long_window
    }

    /// Compute one flag per point, aligned with `series`.
    pub fn compute_flags(&self, series: &[PricePoint]) -> Vec<bool> {
        let closes: Vec<f64> = series.iter().map(|p| p.close).collect();
        let mut short = RollingMean::new(self.short_window);
        let mut long = RollingMean::new(self.long_window);

        let mut flags = Vec::with_capacity(closes.len());
        for i in 0..closes.len() {
            short.advance(&closes, i);
            long.advance(&closes, i);

            if i + 1 < self.long_window {
                flags.push(false);
                continue;
            }

            let flag = match (short.mean(), long.mean()) {
                (Some(avg_short), Some(avg_long)) => is_below(avg_short, avg_long),
                _ => false,
            };
            flags.push(flag);
        }

        flags
    }
}

impl Default for MovingAverageSignal {
    fn default() -> Self {
        Self::FAST
    }
}

/// Compute bearish-cross flags for arbitrary windows.
pub fn compute_flags(
    series: &[PricePoint],
    short_window: usize,
    long_window: usize,
) -> Result<Vec<bool>, SignalError> {
    Ok(MovingAverageSignal::new(short_window, long_window)?.compute_flags(series))
}
