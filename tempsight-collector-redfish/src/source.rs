//! Chassis thermal source.

use tempsight_collector_framework::{FetchError, Point, Result, Source};
use tracing::debug;

use crate::client::{RedfishClient, RedfishSession};
use crate::model::{ChassisCollection, TemperatureReading, Thermal};

const CHASSIS_PATH: &str = "/redfish/v1/Chassis";

/// Collects the selected temperature sensors of every chassis.
#[derive(Debug, Clone)]
pub struct RedfishSource {
    client: RedfishClient,
    sensor_name: String,
    location: String,
}

impl RedfishSource {
    /// Create a source tagging every point with `location`.
    pub fn new(
        client: RedfishClient,
        sensor_name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            client,
            sensor_name: sensor_name.into(),
            location: location.into(),
        }
    }

    /// Get the client.
    pub fn client(&self) -> &RedfishClient {
        &self.client
    }

    /// Temperature sensors of all chassis, in chassis order.
    ///
    /// Any failure discards what was read from earlier chassis.
    pub async fn read_temperatures(&self, session: &RedfishSession) -> Result<Vec<TemperatureReading>> {
        let collection: ChassisCollection = self.client.get(session, CHASSIS_PATH).await?;
        let chassis = collection.member_ids()?;

        let mut readings = Vec::new();
        for id in &chassis {
            let path = format!("{}/Thermal", id.trim_end_matches('/'));
            let thermal: Thermal = self.client.get(session, &path).await?;
            let sensors = thermal.into_readings(&path)?;
            debug!(chassis = %id, sensors = sensors.len(), "Read chassis thermal");
            readings.extend(sensors);
        }

        Ok(readings)
    }
}

impl Source for RedfishSource {
    type Session = RedfishSession;

    fn name(&self) -> &str {
        "redfish"
    }

    async fn open(&self) -> Result<RedfishSession> {
        self.client.login().await
    }

    async fn fetch(&self, session: &RedfishSession) -> Result<Vec<Point>> {
        let readings = self.read_temperatures(session).await?;
        let points = system_temperature_points(&readings, &self.sensor_name, &self.location)?;
        debug!(
            sensors = readings.len(),
            selected = points.len(),
            "Filtered temperature sensors"
        );
        Ok(points)
    }

    async fn close(&self, session: RedfishSession) -> Result<()> {
        self.client.logout(session).await
    }
}

/// Points for the sensors named exactly `sensor_name`.
///
/// Every sensor must carry a `Name`. Only selected sensors need a numeric
/// reading. Points have no timestamp.
pub fn system_temperature_points(
    readings: &[TemperatureReading],
    sensor_name: &str,
    location: &str,
) -> Result<Vec<Point>> {
    let mut points = Vec::new();
    for (index, reading) in readings.iter().enumerate() {
        let name = reading
            .name
            .as_deref()
            .ok_or_else(|| FetchError::missing("Name", format!("Temperatures[{}]", index)))?;
        if name != sensor_name {
            continue;
        }
        let celsius = reading.celsius()?;
        points.push(Point::location_temperature(location, celsius, None)?);
    }
    Ok(points)
}
