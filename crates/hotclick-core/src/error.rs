//! Error types for hotclick-core.

use thiserror::Error;

/// Errors raised while wiring a bridge to its target.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid target: no element matches `{selector}`")]
    InvalidTarget { selector: String },
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
