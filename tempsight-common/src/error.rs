use thiserror::Error;

/// Common error type for TempSight components.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid point: {0}")]
    InvalidPoint(String),
}

/// Result type alias using TempSight's Error.
pub type Result<T> = std::result::Result<T, Error>;
