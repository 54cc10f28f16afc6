//! Error types for the core media primitives.

use thiserror::Error;

/// Error type for core frame and buffer operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid parameter provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unsupported feature or format.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Resource exhausted (memory, buffers, etc.).
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Buffer too small for operation.
    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid parameter error.
    pub fn invalid_param(msg: impl Into<String>) -> Self {
        Error::InvalidParameter(msg.into())
    }

    /// Create an unsupported error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Error::Unsupported(msg.into())
    }

    /// Create a resource exhausted error.
    pub fn exhausted(msg: impl Into<String>) -> Self {
        Error::ResourceExhausted(msg.into())
    }

    /// Check if this error was caused by a failed allocation.
    #[must_use]
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self, Error::ResourceExhausted(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("test parameter".into());
        assert_eq!(err.to_string(), "Invalid parameter: test parameter");

        let err = Error::BufferTooSmall {
            needed: 64,
            available: 32,
        };
        assert_eq!(err.to_string(), "Buffer too small: need 64 bytes, have 32");
    }

    #[test]
    fn test_is_allocation_failure() {
        assert!(Error::exhausted("plane 0").is_allocation_failure());
        assert!(!Error::unsupported("pal8").is_allocation_failure());
    }
}
