//! METAR weather station collector.
//!
//! Polls the aviation weather data service for METAR reports of a set of
//! stations and writes each report's air temperature to InfluxDB.
//!
//! # Points
//!
//! ```text
//! location_temperature,location=<station_id> temperature=<temp_c> <observation_time>
//! ```
//!
//! The timestamp is the observation time reported by the station, not the
//! time of the import.

pub mod cli;
pub mod config;
pub mod parsing;
pub mod source;
