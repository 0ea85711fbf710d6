//! Redfish resources read by the collector.
//!
//! Properties are optional at the serde level so that an absent one is
//! reported as a [`FetchError::MissingField`] naming the resource, instead of
//! a generic decoding failure.

use serde::Deserialize;
use serde_json::Value;
use tempsight_collector_framework::FetchError;

/// `/redfish/v1/Chassis`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChassisCollection {
    #[serde(rename = "Members")]
    pub members: Option<Vec<ODataLink>>,
}

/// A `{"@odata.id": "..."}` reference.
#[derive(Debug, Clone, Deserialize)]
pub struct ODataLink {
    #[serde(rename = "@odata.id")]
    pub odata_id: Option<String>,
}

impl ChassisCollection {
    /// Resource paths of every chassis member.
    ///
    /// An empty collection is [`FetchError::NoData`].
    pub fn member_ids(self) -> Result<Vec<String>, FetchError> {
        let members = self
            .members
            .ok_or_else(|| FetchError::missing("Members", "chassis collection"))?;
        if members.is_empty() {
            return Err(FetchError::NoData("chassis collection has no members".into()));
        }

        members
            .into_iter()
            .enumerate()
            .map(|(index, link)| {
                link.odata_id
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| FetchError::missing("@odata.id", format!("Members[{}]", index)))
            })
            .collect()
    }
}

/// `<chassis>/Thermal`.
#[derive(Debug, Clone, Deserialize)]
pub struct Thermal {
    #[serde(rename = "Temperatures")]
    pub temperatures: Option<Vec<TemperatureReading>>,
}

impl Thermal {
    /// The temperature sensors of this resource.
    pub fn into_readings(self, context: &str) -> Result<Vec<TemperatureReading>, FetchError> {
        self.temperatures
            .ok_or_else(|| FetchError::missing("Temperatures", context))
    }
}

/// One entry of `Thermal.Temperatures`.
#[derive(Debug, Clone, Deserialize)]
pub struct TemperatureReading {
    #[serde(rename = "Name")]
    pub name: Option<String>,

    /// Number, numeric string or null depending on the BMC.
    #[serde(rename = "ReadingCelsius")]
    pub reading_celsius: Option<Value>,
}

impl TemperatureReading {
    /// The sensor reading in degrees Celsius.
    pub fn celsius(&self) -> Result<f64, FetchError> {
        let context = format!("sensor '{}'", self.name.as_deref().unwrap_or("<unnamed>"));

        let value = match &self.reading_celsius {
            None | Some(Value::Null) => return Err(FetchError::missing("ReadingCelsius", context)),
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(_) => None,
        };

        match value {
            Some(celsius) if celsius.is_finite() => Ok(celsius),
            _ => Err(FetchError::invalid(
                "ReadingCelsius",
                self.reading_celsius
                    .as_ref()
                    .map(Value::to_string)
                    .unwrap_or_default(),
                context,
            )),
        }
    }
}
