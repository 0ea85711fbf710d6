//! Redfish chassis thermal collector.
//!
//! Logs in to a BMC once, then on every cycle walks
//! `/redfish/v1/Chassis` and each chassis' `Thermal` resource, keeps the
//! sensors named `System Temp` and writes their readings to InfluxDB.
//!
//! # Points
//!
//! ```text
//! location_temperature,location=<influx location tag> temperature=<ReadingCelsius>
//! ```
//!
//! Points carry no timestamp; InfluxDB assigns the write time.

pub mod cli;
pub mod client;
pub mod config;
pub mod model;
pub mod source;
