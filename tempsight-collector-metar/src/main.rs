//! METAR weather station collector.
//!
//! Imports station temperatures from the aviation weather data service into
//! InfluxDB, once or on a fixed interval.

use anyhow::{Context, Result};
use clap::Parser;
use tempsight_collector_framework::{CollectorConfig, CollectorLoop, InfluxWriter, Shutdown};
use tracing::info;

use tempsight_collector_metar::cli::MetarArgs;
use tempsight_collector_metar::config::MetarCollectorConfig;
use tempsight_collector_metar::source::MetarSource;

#[tokio::main]
async fn main() -> Result<()> {
    let args = MetarArgs::parse();

    // Load configuration
    let mut config = MetarCollectorConfig::load_or_default(args.common.config.as_deref())
        .with_context(|| format!("Failed to load config from {:?}", args.common.config))?;

    // Initialize logging
    tempsight_common::init_tracing(&args.common.logging(&config.logging))
        .map_err(|e| anyhow::anyhow!("Failed to init tracing: {}", e))?;

    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    info!("Starting metar-collector");

    if let Some(ref tag) = config.influx.location_tag {
        info!(
            tag = %tag,
            "Location tag is not used; points are tagged with their station id"
        );
    }

    let source = MetarSource::new(&config.metar)?;
    let sink = InfluxWriter::new(&config.influx)?;
    let schedule = config.schedule()?;

    info!(
        stations = %source.stations().join(","),
        hours_before_now = ?config.metar.hours_before_now,
        "Importing METAR reports"
    );

    let collector = CollectorLoop::new(source, sink, &config.influx.bucket, schedule)
        .with_failure_policy(config.metar.failure_policy);

    collector.run(Shutdown::on_ctrl_c()).await?;

    Ok(())
}
