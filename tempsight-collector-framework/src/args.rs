//! CLI argument groups shared by collectors.

use std::path::PathBuf;

use clap::Args;
use tempsight_common::{InfluxConfig, LogFormat, LoggingConfig};

/// Options every collector accepts.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Path to a JSON5 configuration file. Flags override its values.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (text, json).
    #[arg(long)]
    pub log_format: Option<LogFormat>,
}

impl CommonArgs {
    /// Logging configuration with CLI overrides applied.
    pub fn logging(&self, base: &LoggingConfig) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone().unwrap_or_else(|| base.level.clone()),
            format: self.log_format.unwrap_or(base.format),
        }
    }
}

/// InfluxDB target flags.
#[derive(Args, Debug, Clone, Default)]
pub struct InfluxArgs {
    /// Bucket receiving the points.
    #[arg(short = 'b', long = "influx-bucket")]
    pub bucket: Option<String>,

    /// Value of the `location` tag.
    #[arg(short = 'l', long = "influx-location-tag")]
    pub location_tag: Option<String>,

    /// Organization owning the bucket.
    #[arg(short = 'o', long = "influx-org")]
    pub org: Option<String>,

    /// InfluxDB server URL.
    #[arg(short = 's', long = "influx-url")]
    pub url: Option<String>,

    /// API token with write access.
    #[arg(short = 't', long = "influx-token")]
    pub token: Option<String>,
}

impl InfluxArgs {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut InfluxConfig) {
        if let Some(ref bucket) = self.bucket {
            config.bucket = bucket.clone();
        }
        if let Some(ref tag) = self.location_tag {
            config.location_tag = Some(tag.clone());
        }
        if let Some(ref org) = self.org {
            config.org = org.clone();
        }
        if let Some(ref url) = self.url {
            config.url = url.clone();
        }
        if let Some(ref token) = self.token {
            config.token = token.clone();
        }
    }
}
