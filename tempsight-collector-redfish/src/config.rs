//! Configuration for the Redfish collector.

use serde::{Deserialize, Serialize};
use tempsight_collector_framework::{
    CollectorConfig, CollectorError, FailurePolicy, InfluxConfig, LoggingConfig, Result, Schedule,
};

/// Sensor name selected when none is configured.
pub const DEFAULT_SENSOR_NAME: &str = "System Temp";

/// Complete collector configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedfishCollectorConfig {
    /// BMC connection settings.
    #[serde(default)]
    pub redfish: RedfishConfig,

    /// InfluxDB write target. `location_tag` is required.
    #[serde(default)]
    pub influx: InfluxConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// BMC connection settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct RedfishConfig {
    /// BMC address, with or without scheme (`https` is assumed).
    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub password: String,

    /// Accept self-signed or otherwise invalid certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Exact `Name` of the sensors to collect.
    #[serde(default = "default_sensor_name")]
    pub sensor_name: String,

    /// Seconds between collections.
    #[serde(default)]
    pub collector_interval_secs: Option<u64>,

    /// What to do when a collection fails.
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_sensor_name() -> String {
    DEFAULT_SENSOR_NAME.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for RedfishConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            user: String::new(),
            password: String::new(),
            insecure: false,
            sensor_name: default_sensor_name(),
            collector_interval_secs: None,
            failure_policy: FailurePolicy::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for RedfishConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedfishConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("insecure", &self.insecure)
            .field("sensor_name", &self.sensor_name)
            .field("collector_interval_secs", &self.collector_interval_secs)
            .field("failure_policy", &self.failure_policy)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl RedfishCollectorConfig {
    /// Schedule derived from the collector interval, which is mandatory.
    pub fn schedule(&self) -> Result<Schedule> {
        match self.redfish.collector_interval_secs {
            Some(secs) => Schedule::from_interval_secs(Some(secs)),
            None => Err(CollectorError::config("collector interval is required")),
        }
    }

    /// The `location` tag value shared by every point.
    pub fn location(&self) -> Result<&str> {
        self.influx
            .location_tag
            .as_deref()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .ok_or_else(|| CollectorError::config("influx location tag is required"))
    }
}

impl CollectorConfig for RedfishCollectorConfig {
    fn influx(&self) -> &InfluxConfig {
        &self.influx
    }

    fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    fn validate(&self) -> Result<()> {
        self.influx.validate()?;
        self.location()?;

        let redfish = &self.redfish;
        if redfish.host.trim().is_empty() {
            return Err(CollectorError::config("redfish host is required"));
        }
        if redfish.user.is_empty() {
            return Err(CollectorError::config("redfish user is required"));
        }
        if redfish.password.is_empty() {
            return Err(CollectorError::config("redfish password is required"));
        }
        if redfish.sensor_name.is_empty() {
            return Err(CollectorError::config("sensor name must not be empty"));
        }
        if redfish.timeout_secs == 0 {
            return Err(CollectorError::config("redfish timeout_secs must be > 0"));
        }
        self.schedule()?;

        Ok(())
    }
}
