use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Measurement name shared by every temperature collector.
pub const MEASUREMENT_LOCATION_TEMPERATURE: &str = "location_temperature";

/// Tag carrying the station or host identifier.
pub const TAG_LOCATION: &str = "location";

/// Field carrying the temperature in degrees Celsius.
pub const FIELD_TEMPERATURE: &str = "temperature";

/// A single time-series sample destined for the datastore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Measurement name (e.g., "location_temperature").
    pub measurement: String,

    /// Indexed labels. Keys are unique.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,

    /// Numeric values.
    pub fields: BTreeMap<String, FieldValue>,

    /// Explicit sample time. When absent the datastore assigns the write time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Point {
    /// Create an empty point for the given measurement.
    pub fn new(measurement: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
            tags: BTreeMap::new(),
            fields: BTreeMap::new(),
            timestamp: None,
        }
    }

    /// Build a `location_temperature` point.
    ///
    /// Fails if `location` is empty or `celsius` is not finite.
    pub fn location_temperature(
        location: impl Into<String>,
        celsius: f64,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        let location = location.into();
        if location.is_empty() {
            return Err(Error::InvalidPoint(format!(
                "'{}' tag must not be empty",
                TAG_LOCATION
            )));
        }
        if !celsius.is_finite() {
            return Err(Error::InvalidPoint(format!(
                "temperature for '{}' is not finite: {}",
                location, celsius
            )));
        }

        let mut point = Point::new(MEASUREMENT_LOCATION_TEMPERATURE)
            .with_tag(TAG_LOCATION, location)
            .with_field(FIELD_TEMPERATURE, FieldValue::Float(celsius));
        point.timestamp = timestamp;
        Ok(point)
    }

    /// Add a tag to this point.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Add a field to this point.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Set an explicit timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// The `location` tag, if set.
    pub fn location(&self) -> Option<&str> {
        self.tags.get(TAG_LOCATION).map(String::as_str)
    }

    /// The `temperature` field, if set as a float.
    pub fn temperature(&self) -> Option<f64> {
        match self.fields.get(FIELD_TEMPERATURE) {
            Some(FieldValue::Float(v)) => Some(*v),
            _ => None,
        }
    }
}

/// Typed field value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    /// 64-bit signed integer.
    Integer(i64),

    /// 64-bit float.
    Float(f64),
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}
