//! Command-line interface.

use clap::Parser;
use tempsight_collector_framework::{CommonArgs, FailurePolicy, InfluxArgs};

use crate::config::{MetarCollectorConfig, parse_fetch_interval, parse_station_string};

/// Imports METAR station temperatures into InfluxDB.
#[derive(Parser, Debug)]
#[command(name = "metar-collector")]
#[command(about = "Imports METAR station temperatures into InfluxDB")]
#[command(version)]
pub struct MetarArgs {
    /// Comma-separated station identifiers (e.g., "KBOS,KJFK").
    #[arg(short = 'i', long = "station-string")]
    pub station_string: Option<String>,

    /// Request reports from the last N hours.
    #[arg(short = 'H', long = "hours-before-now")]
    pub hours_before_now: Option<u32>,

    /// Seconds between imports. Absent, zero or not an integer: import once.
    #[arg(short = 'I', long = "fetch-interval")]
    pub fetch_interval: Option<String>,

    /// Weather data service endpoint.
    #[arg(long = "metar-url")]
    pub metar_url: Option<String>,

    /// Exit on the first failed import instead of waiting for the next one.
    #[arg(long)]
    pub fail_fast: bool,

    #[command(flatten)]
    pub influx: InfluxArgs,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl MetarArgs {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut MetarCollectorConfig) {
        if let Some(ref stations) = self.station_string {
            config.metar.stations = parse_station_string(stations);
        }
        if let Some(hours) = self.hours_before_now {
            config.metar.hours_before_now = Some(hours);
        }
        if let Some(ref interval) = self.fetch_interval {
            config.metar.fetch_interval_secs = parse_fetch_interval(interval);
        }
        if let Some(ref url) = self.metar_url {
            config.metar.url = url.clone();
        }
        if self.fail_fast {
            config.metar.failure_policy = FailurePolicy::Abort;
        }
        self.influx.apply(&mut config.influx);
    }
}
