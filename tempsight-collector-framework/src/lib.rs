//! TempSight Collector Framework
//!
//! Common abstractions for building collectors that poll a telemetry source
//! and write temperature points to InfluxDB.
//!
//! # Overview
//!
//! This framework provides:
//! - [`Source`] and [`Sink`] traits separating fetching from writing
//! - [`InfluxWriter`], the InfluxDB v2 sink
//! - [`CollectorLoop`] for the fetch → write → sleep cycle, with [`Schedule`],
//!   [`FailurePolicy`] and external cancellation through [`Shutdown`]
//! - [`CollectorConfig`] trait for JSON5 configuration loading and validation
//! - [`CommonArgs`] and [`InfluxArgs`] for shared CLI flags
//! - [`CollectorError`] and [`FetchError`], the error taxonomy
//!
//! # Example
//!
//! ```ignore
//! use tempsight_collector_framework::{CollectorLoop, InfluxWriter, Schedule, Shutdown};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = MyCollectorConfig::load_or_default(None)?;
//!     config.validate()?;
//!
//!     let sink = InfluxWriter::new(&config.influx)?;
//!     let collector = CollectorLoop::new(MySource::new(), sink, &config.influx.bucket, Schedule::Once);
//!
//!     collector.run(Shutdown::on_ctrl_c()).await?;
//!     Ok(())
//! }
//! ```

mod args;
mod config;
mod error;
mod runner;
pub mod shutdown;
mod sink;
mod source;

pub use args::{CommonArgs, InfluxArgs};
pub use config::CollectorConfig;
pub use error::{CollectorError, FetchError, Result};
pub use runner::{CollectorLoop, FailurePolicy, LoopSummary, Schedule};
pub use shutdown::Shutdown;
pub use sink::{InfluxWriter, Sink};
pub use source::Source;

// Re-export commonly used types from tempsight-common
pub use tempsight_common::{FieldValue, InfluxConfig, LogFormat, LoggingConfig, Point};
