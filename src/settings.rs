//! Exporter settings.
//!
//! Values are layered, later sources winning:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`--config`)
//! 3. `SB8200_*` environment variables (e.g. `SB8200_MODEM_URL`)
//! 4. command line flags
//!
//! ```toml
//! metrics_addr = "0.0.0.0:9292"
//! metrics_path = "/metrics"
//! modem_url = "http://192.168.100.1/cmconnectionstatus.html"
//! namespace = "sb8200"
//! collect_timeout_secs = 30
//! stale_channels = "remove"
//! log_level = "info"
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

use sb8200_adapters::sb8200::DEFAULT_URL;
use sb8200_metrics::prometheus::{DEFAULT_METRICS_PATH, DEFAULT_NAMESPACE};
use sb8200_metrics::StaleChannelPolicy;

/// Resolved exporter settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Path under which metrics are served.
    pub metrics_path: String,
    /// Listen address; a bare `:port` binds all interfaces.
    pub metrics_addr: String,
    /// Modem status page URL.
    pub modem_url: String,
    /// Metric name prefix; empty for none.
    pub namespace: String,
    /// Limit on one collection cycle, in seconds.
    pub collect_timeout_secs: u64,
    /// `retain` or `remove`.
    pub stale_channels: String,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub metrics_path: Option<String>,
    pub metrics_addr: Option<String>,
    pub modem_url: Option<String>,
}

impl Settings {
    /// Load settings from defaults, an optional file, the environment, and overrides.
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("metrics_path", DEFAULT_METRICS_PATH)?
            .set_default("metrics_addr", ":9292")?
            .set_default("modem_url", DEFAULT_URL)?
            .set_default("namespace", DEFAULT_NAMESPACE)?
            .set_default("collect_timeout_secs", 30_i64)?
            .set_default("stale_channels", "remove")?
            .set_default("log_level", "info")?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(Environment::with_prefix("SB8200"))
            .set_override_option("metrics_path", overrides.metrics_path.clone())?
            .set_override_option("metrics_addr", overrides.metrics_addr.clone())?
            .set_override_option("modem_url", overrides.modem_url.clone())?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Socket address to bind, with `:port` expanded to all interfaces.
    pub fn listen_addr(&self) -> String {
        if self.metrics_addr.starts_with(':') {
            format!("0.0.0.0{}", self.metrics_addr)
        } else {
            self.metrics_addr.clone()
        }
    }

    pub fn collect_timeout(&self) -> Duration {
        Duration::from_secs(self.collect_timeout_secs)
    }

    pub fn stale_policy(&self) -> Result<StaleChannelPolicy> {
        self.stale_channels.parse().map_err(anyhow::Error::msg)
    }
}
