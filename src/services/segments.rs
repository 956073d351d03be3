//! Splits a flagged series into maximal same-flag runs.

use crate::error::SignalError;
use crate::types::{PricePoint, Segment};

/// Group consecutive points sharing a flag into segments.
///
/// Concatenating the returned segments yields `series` unchanged, and no two
/// neighbouring segments carry the same flag.
pub fn build_segments(series: &[PricePoint], flags: &[bool]) -> Result<Vec<Segment>, SignalError> {
    if series.len() != flags.len() {
        return Err(SignalError::LengthMismatch {
            series: series.len(),
            flags: flags.len(),
        });
    }

    let mut segments: Vec<Segment> = Vec::new();
    for (point, &flag) in series.iter().zip(flags) {
        match segments.last_mut() {
            Some(current) if current.flag == flag => current.points.push(*point),
            _ => segments.push(Segment {
                flag,
                points: vec![*point],
            }),
        }
    }

    Ok(segments)
}
