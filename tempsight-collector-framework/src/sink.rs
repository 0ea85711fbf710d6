//! Datastore sinks.

use std::time::Duration;

use reqwest::header;
use tempsight_common::{InfluxConfig, Point, encode_batch};

use crate::error::{CollectorError, Result};

/// Destination for batches of points.
#[allow(async_fn_in_trait)]
pub trait Sink {
    /// Submit the whole batch to `bucket`.
    ///
    /// Returns only once the datastore has acknowledged the batch. A failure
    /// applies to the whole batch; nothing is retried.
    async fn write(&self, bucket: &str, points: &[Point]) -> Result<()>;
}

/// InfluxDB v2 writer.
///
/// Each [`write`](Sink::write) is one synchronous `POST /api/v2/write` carrying
/// the entire batch as line protocol, so InfluxDB accepts or rejects it as a
/// unit.
#[derive(Clone, Debug)]
pub struct InfluxWriter {
    client: reqwest::Client,
    /// String of the form `<url>/api/v2/write`.
    write_url: String,
    org: String,
    /// String of the form `Token <api_token>`.
    token_header: String,
}

impl InfluxWriter {
    /// Create a writer for the configured server and organization.
    pub fn new(config: &InfluxConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CollectorError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            write_url: format!("{}/api/v2/write", config.url.trim_end_matches('/')),
            org: config.org.clone(),
            token_header: format!("Token {}", config.token),
        })
    }

    /// Get the organization.
    pub fn org(&self) -> &str {
        &self.org
    }
}

impl Sink for InfluxWriter {
    async fn write(&self, bucket: &str, points: &[Point]) -> Result<()> {
        // Empty batches go out as an empty body, which InfluxDB acknowledges
        let body = encode_batch(points)?;

        let response = self
            .client
            .post(&self.write_url)
            .query(&[
                ("org", self.org.as_str()),
                ("bucket", bucket),
                ("precision", "ns"),
            ])
            .header(header::AUTHORIZATION, &self.token_header)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                CollectorError::write(format!("request to {} failed: {}", self.write_url, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CollectorError::write(format!(
                "InfluxDB returned HTTP {}: {}",
                status.as_u16(),
                detail.trim()
            )));
        }

        tracing::trace!(bucket, points = points.len(), "Batch acknowledged");

        Ok(())
    }
}
