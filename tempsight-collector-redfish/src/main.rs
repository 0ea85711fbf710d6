//! Redfish chassis thermal collector.
//!
//! Logs in to a BMC and periodically writes its system temperature sensors
//! to InfluxDB until interrupted.

use anyhow::{Context, Result};
use clap::Parser;
use tempsight_collector_framework::{CollectorConfig, CollectorLoop, InfluxWriter, Shutdown};
use tracing::{info, warn};

use tempsight_collector_redfish::cli::RedfishArgs;
use tempsight_collector_redfish::client::RedfishClient;
use tempsight_collector_redfish::config::RedfishCollectorConfig;
use tempsight_collector_redfish::source::RedfishSource;

#[tokio::main]
async fn main() -> Result<()> {
    let args = RedfishArgs::parse();

    // Load configuration
    let mut config = RedfishCollectorConfig::load_or_default(args.common.config.as_deref())
        .with_context(|| format!("Failed to load config from {:?}", args.common.config))?;

    // Initialize logging
    tempsight_common::init_tracing(&args.common.logging(&config.logging))
        .map_err(|e| anyhow::anyhow!("Failed to init tracing: {}", e))?;

    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    info!("Starting redfish-collector");

    if config.redfish.insecure {
        warn!("TLS certificate verification is disabled for the BMC");
    }

    let client = RedfishClient::new(&config.redfish)?;
    info!(
        bmc = %client.base_url(),
        sensor = %config.redfish.sensor_name,
        "Collecting chassis temperatures"
    );

    let source = RedfishSource::new(client, &config.redfish.sensor_name, config.location()?);
    let sink = InfluxWriter::new(&config.influx)?;
    let schedule = config.schedule()?;

    let collector = CollectorLoop::new(source, sink, &config.influx.bucket, schedule)
        .with_failure_policy(config.redfish.failure_policy);

    collector.run(Shutdown::on_ctrl_c()).await?;

    Ok(())
}
