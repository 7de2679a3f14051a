// Copyright 2025 Lars Brubaker
// License: MIT

use thiserror::Error;

/// Failures of ring ingestion and clipping.
///
/// Recoverable variants describe input the engine cannot process. Fatal
/// variants mean an internal invariant broke; they are never expected from
/// correct orchestration and are reported instead of panicking.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipError {
    #[error("intersections in the scanbeam at y = {y} could not be ordered between adjacent edges")]
    IntersectionOrder { y: i64 },

    #[error("coordinate {value} is outside the supported range of +/-{limit}")]
    CoordinateOutOfRange { value: i64, limit: i64 },

    #[error("coordinate cannot be represented as a 64-bit integer")]
    CoordinateConversion,

    #[error("open paths must be subject paths")]
    OpenClipPath,

    #[error("edge {edge} has no further segment in its bound")]
    NoNextInBound { edge: u32 },

    #[error("edge {edge} and its maxima pair disagree on output ownership")]
    InconsistentMaxima { edge: u32 },

    #[error("output point {point} is freed or not linked into its ring")]
    StalePoint { point: u32 },

    #[error("output coordinate {value} does not fit the requested coordinate type")]
    CoordinateOverflow { value: i64 },
}

impl ClipError {
    /// Internal invariant breach as opposed to unsupported input.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ClipError::NoNextInBound { .. }
                | ClipError::InconsistentMaxima { .. }
                | ClipError::StalePoint { .. }
                | ClipError::CoordinateOverflow { .. }
        )
    }
}

pub type ClipResult<T> = Result<T, ClipError>;
