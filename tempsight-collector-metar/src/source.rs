//! Weather data service source.

use std::time::Duration;

use tempsight_collector_framework::{CollectorError, FetchError, Point, Result, Source};
use tracing::debug;

use crate::config::MetarConfig;
use crate::parsing::parse_metar_response;

/// Fetches METAR reports for a fixed station set.
#[derive(Debug, Clone)]
pub struct MetarSource {
    client: reqwest::Client,
    url: String,
    stations: Vec<String>,
    hours_before_now: u32,
}

impl MetarSource {
    /// Create a source from validated settings.
    pub fn new(config: &MetarConfig) -> Result<Self> {
        let hours_before_now = config
            .hours_before_now
            .ok_or_else(|| CollectorError::config("hours before now is required"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CollectorError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            stations: config.stations.clone(),
            hours_before_now,
        })
    }

    /// Get the configured stations.
    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    /// Fetch reports for `stations` from the last `hours_before_now` hours.
    ///
    /// One GET, no retry.
    pub async fn fetch_stations(
        &self,
        stations: &[String],
        hours_before_now: u32,
    ) -> Result<Vec<Point>> {
        let station_string = stations.join(",");
        let hours = hours_before_now.to_string();

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("dataSource", "metars"),
                ("requestType", "retrieve"),
                ("format", "xml"),
                ("stationString", station_string.as_str()),
                ("hoursBeforeNow", hours.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::request(&self.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::request(&self.url, e))?;

        let points = parse_metar_response(&body)?;
        debug!(
            stations = %station_string,
            hours_before_now,
            reports = points.len(),
            "Parsed METAR reports"
        );

        Ok(points)
    }
}

impl Source for MetarSource {
    type Session = ();

    fn name(&self) -> &str {
        "metar"
    }

    async fn open(&self) -> Result<()> {
        Ok(())
    }

    async fn fetch(&self, _session: &()) -> Result<Vec<Point>> {
        self.fetch_stations(&self.stations, self.hours_before_now)
            .await
    }

    async fn close(&self, _session: ()) -> Result<()> {
        Ok(())
    }
}
