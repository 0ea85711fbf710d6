//! Error types for the collector framework.

use thiserror::Error;

/// Result type alias using [`CollectorError`].
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Failures reaching a source or validating what it returned.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request never produced a response (connect, TLS, timeout).
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The source answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Session establishment or an authenticated call was refused.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A required property is absent from the response.
    #[error("missing field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// A property is present but cannot be interpreted.
    #[error("invalid value '{value}' for field '{field}' in {context}")]
    InvalidValue {
        field: String,
        value: String,
        context: String,
    },

    /// The source returned nothing to collect from.
    #[error("no data: {0}")]
    NoData(String),
}

impl FetchError {
    /// Create a missing field error.
    pub fn missing(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid(
        field: impl Into<String>,
        value: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            context: context.into(),
        }
    }

    /// Create a request error from a transport failure.
    pub fn request(url: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Request {
            url: url.into(),
            message: err.to_string(),
        }
    }
}

/// Errors that can occur in a collector.
#[derive(Error, Debug)]
pub enum CollectorError {
    /// Network, authentication or missing-field failure at the source.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Malformed response body.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The datastore rejected the batch or was unreachable.
    #[error("Write error: {0}")]
    Write(String),

    /// Missing or invalid setting.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file not found.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },
}

impl CollectorError {
    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a write error.
    pub fn write(msg: impl Into<String>) -> Self {
        Self::Write(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Short error category, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::Parse(_) => "parse",
            Self::Write(_) => "write",
            Self::Config(_) | Self::ConfigNotFound { .. } => "config",
        }
    }

    /// Whether the source refused the session, so later fetches on it
    /// cannot succeed.
    pub fn is_session_lost(&self) -> bool {
        matches!(self, Self::Fetch(FetchError::Auth(_)))
    }
}

/// Point encoding only happens on the way to the datastore, so an invalid
/// point surfaces as a write failure.
impl From<tempsight_common::Error> for CollectorError {
    fn from(err: tempsight_common::Error) -> Self {
        match err {
            tempsight_common::Error::Config(msg) => Self::Config(msg),
            tempsight_common::Error::InvalidPoint(msg) => Self::Write(msg),
        }
    }
}
