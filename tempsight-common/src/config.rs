use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// InfluxDB v2 write target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfluxConfig {
    /// Server URL (e.g., "http://localhost:8086").
    #[serde(default)]
    pub url: String,

    /// Organization owning the bucket.
    #[serde(default)]
    pub org: String,

    /// Bucket receiving the points.
    #[serde(default)]
    pub bucket: String,

    /// API token with write access to the bucket.
    #[serde(default)]
    pub token: String,

    /// Value of the `location` tag for collectors that use a fixed location.
    #[serde(default)]
    pub location_tag: Option<String>,

    /// Write request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for InfluxConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            org: String::new(),
            bucket: String::new(),
            token: String::new(),
            location_tag: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl InfluxConfig {
    /// Check that every connection setting is present.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("influx url", &self.url),
            ("influx org", &self.org),
            ("influx bucket", &self.bucket),
            ("influx token", &self.token),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{} is required", name)));
            }
        }

        if self.timeout_secs == 0 {
            return Err(Error::Config("influx timeout_secs must be > 0".into()));
        }

        Ok(())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(Error::Config(format!(
                "unknown log format '{}' (expected 'text' or 'json')",
                other
            ))),
        }
    }
}

/// Common logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format: "text" or "json".
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Load a configuration file in JSON5 format.
pub fn load_config<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    json5::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Load a configuration from a JSON5 string.
pub fn parse_config<T: for<'de> Deserialize<'de>>(content: &str) -> Result<T> {
    json5::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
}
