//! Command-line interface.

use clap::Parser;
use tempsight_collector_framework::{CommonArgs, FailurePolicy, InfluxArgs};

use crate::config::RedfishCollectorConfig;

/// Imports Redfish chassis temperatures into InfluxDB.
#[derive(Parser, Debug)]
#[command(name = "redfish-collector")]
#[command(about = "Imports Redfish chassis temperatures into InfluxDB")]
#[command(version)]
pub struct RedfishArgs {
    /// BMC address (e.g., "bmc.example.net" or "https://10.0.0.5").
    #[arg(short = 'H', long = "redfish-host")]
    pub host: Option<String>,

    /// BMC user.
    #[arg(short = 'u', long = "redfish-user")]
    pub user: Option<String>,

    /// BMC password.
    #[arg(short = 'p', long = "redfish-password")]
    pub password: Option<String>,

    /// Accept self-signed BMC certificates.
    #[arg(long = "redfish-insecure")]
    pub insecure: bool,

    /// Name of the sensors to collect.
    #[arg(long = "sensor-name")]
    pub sensor_name: Option<String>,

    /// Seconds between collections.
    #[arg(short = 'i', long = "collector-interval")]
    pub collector_interval: Option<u64>,

    /// Exit on the first failed collection instead of waiting for the next one.
    #[arg(long)]
    pub fail_fast: bool,

    #[command(flatten)]
    pub influx: InfluxArgs,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl RedfishArgs {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut RedfishCollectorConfig) {
        let redfish = &mut config.redfish;
        if let Some(ref host) = self.host {
            redfish.host = host.clone();
        }
        if let Some(ref user) = self.user {
            redfish.user = user.clone();
        }
        if let Some(ref password) = self.password {
            redfish.password = password.clone();
        }
        if self.insecure {
            redfish.insecure = true;
        }
        if let Some(ref name) = self.sensor_name {
            redfish.sensor_name = name.clone();
        }
        if let Some(interval) = self.collector_interval {
            redfish.collector_interval_secs = Some(interval);
        }
        if self.fail_fast {
            redfish.failure_policy = FailurePolicy::Abort;
        }
        self.influx.apply(&mut config.influx);
    }
}
