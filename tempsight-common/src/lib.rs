//! TempSight Common Library
//!
//! This crate provides shared types and utilities for TempSight temperature collectors:
//!
//! - [`point`] - Time-series sample model (`Point`, `FieldValue`)
//! - [`line_protocol`] - InfluxDB line protocol encoding
//! - [`config`] - Configuration loading (JSON5 format) and shared sections
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod line_protocol;
pub mod point;

// Re-export commonly used types at the crate root
pub use config::{InfluxConfig, LogFormat, LoggingConfig, load_config, parse_config};
pub use error::{Error, Result};
pub use line_protocol::{encode_batch, encode_point};
pub use point::{
    FIELD_TEMPERATURE, FieldValue, MEASUREMENT_LOCATION_TEMPERATURE, Point, TAG_LOCATION,
};

/// Initialize tracing with the given configuration.
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// Supports two output formats:
/// - `LogFormat::Text` (default): Human-readable text format
/// - `LogFormat::Json`: Structured JSON format for log aggregation systems
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
    }

    tracing::debug!(level = %config.level, format = ?config.format, "Tracing initialized");

    Ok(())
}
