//! Configuration traits and utilities.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{CollectorError, Result};
use tempsight_common::{InfluxConfig, LoggingConfig};

/// Trait for collector configuration types.
///
/// Implement this trait for your collector's configuration struct to get
/// JSON5 loading and access to the common sections. Command-line flags are
/// usually merged on top of the loaded file, so loading does not validate;
/// call [`validate`](Self::validate) once the configuration is final.
///
/// # Example
///
/// ```ignore
/// use serde::Deserialize;
/// use tempsight_collector_framework::{CollectorConfig, InfluxConfig, LoggingConfig};
///
/// #[derive(Debug, Default, Deserialize)]
/// pub struct MyCollectorConfig {
///     #[serde(default)]
///     pub influx: InfluxConfig,
///     #[serde(default)]
///     pub logging: LoggingConfig,
/// }
///
/// impl CollectorConfig for MyCollectorConfig {
///     fn influx(&self) -> &InfluxConfig {
///         &self.influx
///     }
///
///     fn logging(&self) -> &LoggingConfig {
///         &self.logging
///     }
/// }
/// ```
pub trait CollectorConfig: Sized + DeserializeOwned + Default {
    /// Get the InfluxDB write target.
    fn influx(&self) -> &InfluxConfig;

    /// Get the logging configuration.
    fn logging(&self) -> &LoggingConfig;

    /// Validate the configuration.
    ///
    /// The default checks the InfluxDB section. Override to add source
    /// settings, and keep calling `self.influx().validate()`.
    fn validate(&self) -> Result<()> {
        self.influx().validate()?;
        Ok(())
    }

    /// Load configuration from a JSON5 file.
    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CollectorError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        Ok(tempsight_common::load_config(path)?)
    }

    /// Load from `path` when given, otherwise start from defaults.
    fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
