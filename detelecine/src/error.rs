//! Error types for the detelecine filter.

use detelecine_core::Rational;
use thiserror::Error;

/// Detelecine error types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetelecineError {
    /// The cadence string is empty, contains a non-digit or never advances.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// The start frame lies outside one pattern cycle.
    #[error("Invalid start frame {start_frame}: pattern produces {frames_per_cycle} frames per cycle")]
    InvalidPhase {
        /// Requested start frame.
        start_frame: usize,
        /// Frames one full pattern cycle produces.
        frames_per_cycle: usize,
    },

    /// The input does not have a constant, well-formed frame rate.
    #[error("The input needs a constant frame rate; current rate of {0} is invalid")]
    UnsupportedRate(Rational),

    /// Buffer allocation failed.
    #[error("Buffer allocation failed: {0}")]
    AllocationFailure(String),

    /// A frame arrived before the stream was configured.
    #[error("Filter not configured: {0}")]
    NotConfigured(&'static str),

    /// Input frame does not match the configured stream geometry.
    #[error("Frame geometry mismatch: expected {expected_width}x{expected_height} {expected_format}, got {actual_width}x{actual_height} {actual_format}")]
    GeometryMismatch {
        /// Configured width in pixels.
        expected_width: u32,
        /// Configured height in pixels.
        expected_height: u32,
        /// Configured pixel format.
        expected_format: String,
        /// Width of the offending frame.
        actual_width: u32,
        /// Height of the offending frame.
        actual_height: u32,
        /// Pixel format of the offending frame.
        actual_format: String,
    },

    /// The downstream consumer rejected a frame.
    #[error("Downstream error: {0}")]
    Downstream(String),

    /// Core library error.
    #[error("Core error: {0}")]
    Core(detelecine_core::Error),
}

/// Result type for detelecine operations.
pub type Result<T> = std::result::Result<T, DetelecineError>;

impl From<detelecine_core::Error> for DetelecineError {
    fn from(err: detelecine_core::Error) -> Self {
        match err {
            detelecine_core::Error::ResourceExhausted(msg) => Self::AllocationFailure(msg),
            other => Self::Core(other),
        }
    }
}

impl DetelecineError {
    /// Create an invalid pattern error.
    pub fn invalid_pattern(msg: impl Into<String>) -> Self {
        Self::InvalidPattern(msg.into())
    }

    /// Create a downstream delivery error.
    pub fn downstream(msg: impl Into<String>) -> Self {
        Self::Downstream(msg.into())
    }

    /// Check if this error is detected while setting up the stream.
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPattern(_) | Self::InvalidPhase { .. } | Self::UnsupportedRate(_)
        )
    }
}
