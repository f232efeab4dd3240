//! Error types for the astronomical calculators.
//!
//! Both calculators fail only when the underlying computation cannot produce a
//! value for the given input. Callers recover by rendering placeholder text;
//! a circumpolar sun is a regular result, never one of these errors.

use thiserror::Error;

/// A position that cannot be used for any computation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PositionError {
    #[error("latitude must be between -90 and 90 degrees (got {0})")]
    Latitude(f64),

    #[error("longitude must be between -180 and 180 degrees (got {0})")]
    Longitude(f64),

    #[error("elevation must be a finite, non-negative number of meters (got {0})")]
    Elevation(f64),
}

/// The lunar ephemeris could not produce a phase for this input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhaseComputationError {
    #[error("invalid position: {0}")]
    InvalidPosition(#[from] PositionError),

    #[error("lunar ephemeris produced a non-finite value for lunation {lunation}")]
    NumericFailure { lunation: i64 },

    #[error("new moon search did not converge around julian day {jd:.3}")]
    SearchFailed { jd: f64 },

    #[error("new moon instant is outside the representable date range")]
    OutOfRange,
}

/// The solar computation could not produce sunrise/sunset for this input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SunEventError {
    #[error("invalid position: {0}")]
    InvalidPosition(#[from] PositionError),

    #[error("date {0} is outside the supported range")]
    OutOfRange(chrono::NaiveDate),

    #[error("no {event} found within the search window starting {start}")]
    NotFound {
        event: &'static str,
        start: chrono::NaiveDate,
    },
}
