//! Common error types for hotclick-platform.

use thiserror::Error;

/// Platform-level errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("invalid selector: {0}")]
    InvalidSelector(String),
    #[error("duplicate element id: {0}")]
    DuplicateId(String),
    #[error("invalid input line: {0}")]
    InvalidInput(String),
    #[error("clock cannot be advanced manually")]
    RealClock,
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;
