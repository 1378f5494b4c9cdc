//! Error types for value resolution.

use serde::{Deserialize, Serialize};

/// Everything that can go wrong while resolving an animated value.
///
/// Only malformed descriptors fail. Spring evaluation itself never errors;
/// the variants that mention springs come from measuring a natural duration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ResolveError {
    /// Input and output ranges differ in length
    #[error("inputRange ({input_len}) and outputRange ({output_len}) must have the same length")]
    RangeLengthMismatch { input_len: usize, output_len: usize },

    /// Fewer than two control points
    #[error("{range} must have at least 2 elements, got {len}")]
    RangeTooShort { range: String, len: usize },

    /// Input control points are not strictly increasing
    #[error("inputRange must be strictly monotonically increasing, but {prev} at index {index} is followed by {next}")]
    NonMonotonicInputRange { index: usize, prev: f64, next: f64 },

    /// A control point is NaN or infinite
    #[error("{range} must contain only finite numbers, got {value} at index {index}")]
    NonFiniteRange {
        range: String,
        index: usize,
        value: f64,
    },

    /// Two neighbouring control points are too far apart to subtract
    #[error("{range} span from {prev} to {next} at index {index} overflows")]
    SpanOverflow {
        range: String,
        index: usize,
        prev: f64,
        next: f64,
    },

    /// The value being interpolated is NaN or infinite
    #[error("cannot interpolate a non-numeric input ({value})")]
    NonFiniteInput { value: f64 },

    /// Rest threshold for spring measurement is unusable
    #[error("spring rest threshold must be a positive finite number, got {threshold}")]
    InvalidThreshold { threshold: f64 },

    /// Frame rate is zero, negative, or not finite
    #[error("fps must be a positive finite number, got {fps}")]
    InvalidFps { fps: f64 },

    /// Spring did not come to rest while measuring its duration
    #[error("spring did not settle within {max_frames} frames (threshold {threshold})")]
    SpringNeverSettles { max_frames: u32, threshold: f64 },

    /// Configuration failed validation
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// Descriptor or composition JSON could not be parsed
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl ResolveError {
    /// Error category for logging and host-side reporting.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::RangeLengthMismatch { .. }
            | Self::RangeTooShort { .. }
            | Self::NonMonotonicInputRange { .. }
            | Self::NonFiniteRange { .. }
            | Self::SpanOverflow { .. }
            | Self::NonFiniteInput { .. } => "interpolation",
            Self::InvalidThreshold { .. } | Self::SpringNeverSettles { .. } => "spring",
            Self::InvalidFps { .. } | Self::InvalidConfig { .. } => "config",
            Self::Serialization { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for ResolveError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}
