//! Configuration for the METAR collector.

use serde::{Deserialize, Serialize};
use tempsight_collector_framework::{
    CollectorConfig, CollectorError, FailurePolicy, InfluxConfig, LoggingConfig, Result, Schedule,
};

/// Default ADDS data server endpoint.
pub const DEFAULT_METAR_URL: &str = "https://aviationweather.gov/adds/dataserver_current/httpparam";

/// Complete collector configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetarCollectorConfig {
    /// Weather service settings.
    #[serde(default)]
    pub metar: MetarConfig,

    /// InfluxDB write target.
    #[serde(default)]
    pub influx: InfluxConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather data service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetarConfig {
    /// Data server endpoint.
    #[serde(default = "default_url")]
    pub url: String,

    /// ICAO station identifiers (e.g., "KBOS").
    #[serde(default)]
    pub stations: Vec<String>,

    /// How far back to request reports, in hours.
    #[serde(default)]
    pub hours_before_now: Option<u32>,

    /// Seconds between imports. Absent means import once and exit.
    #[serde(default)]
    pub fetch_interval_secs: Option<u64>,

    /// What to do when an import fails while running periodically.
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    DEFAULT_METAR_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for MetarConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            stations: Vec::new(),
            hours_before_now: None,
            fetch_interval_secs: None,
            failure_policy: FailurePolicy::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl MetarCollectorConfig {
    /// Schedule derived from the fetch interval.
    pub fn schedule(&self) -> Result<Schedule> {
        Schedule::from_interval_secs(self.metar.fetch_interval_secs)
    }
}

impl CollectorConfig for MetarCollectorConfig {
    fn influx(&self) -> &InfluxConfig {
        &self.influx
    }

    fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    fn validate(&self) -> Result<()> {
        self.influx.validate()?;

        // Unused: points are tagged with the station id
        if self
            .influx
            .location_tag
            .as_deref()
            .is_none_or(|tag| tag.trim().is_empty())
        {
            return Err(CollectorError::config("influx location tag is required"));
        }
        if self.metar.url.trim().is_empty() {
            return Err(CollectorError::config("metar url is required"));
        }
        if self.metar.stations.is_empty() {
            return Err(CollectorError::config("at least one station is required"));
        }
        if self.metar.hours_before_now.is_none() {
            return Err(CollectorError::config("hours before now is required"));
        }
        if self.metar.timeout_secs == 0 {
            return Err(CollectorError::config("metar timeout_secs must be > 0"));
        }
        self.schedule()?;

        Ok(())
    }
}

/// Split a comma-joined station list.
///
/// Codes are trimmed and uppercased; blanks and repeats are dropped, first
/// occurrence wins.
pub fn parse_station_string(raw: &str) -> Vec<String> {
    let mut stations: Vec<String> = Vec::new();
    for code in raw.split(',') {
        let code = code.trim().to_ascii_uppercase();
        if !code.is_empty() && !stations.contains(&code) {
            stations.push(code);
        }
    }
    stations
}

/// Interpret the fetch interval flag.
///
/// Anything that is not a positive integer means "run once".
pub fn parse_fetch_interval(raw: &str) -> Option<u64> {
    match raw.trim().parse::<u64>() {
        Ok(0) => {
            tracing::warn!(value = raw, "Fetch interval is zero, importing once");
            None
        }
        Ok(secs) => Some(secs),
        Err(_) => {
            tracing::warn!(value = raw, "Fetch interval is not an integer, importing once");
            None
        }
    }
}
