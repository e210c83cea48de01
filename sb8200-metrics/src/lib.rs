//! # sb8200-metrics
//!
//! Exposes SB8200 channel readings as Prometheus gauges.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use sb8200_adapters::sb8200::Sb8200Adapter;
//! use sb8200_metrics::{ModemCollector, StaleChannelPolicy};
//! use sb8200_metrics::prometheus::{PrometheusConfig, PrometheusExporter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let adapter = Sb8200Adapter::builder()
//!         .url("http://192.168.100.1/cmconnectionstatus.html")
//!         .build()?;
//!
//!     let collector = ModemCollector::new(adapter)
//!         .timeout(Duration::from_secs(30))
//!         .stale_policy(StaleChannelPolicy::Remove);
//!
//!     // Each scrape of /metrics fetches the modem page once
//!     let exporter = PrometheusExporter::new(PrometheusConfig::default(), collector);
//!     exporter.serve().await
//! }
//! ```
//!
//! ## Features
//!
//! - **Collect on scrape**: no background polling, one modem request per scrape
//! - **All or nothing**: a failed collection leaves every gauge untouched
//! - **Explicit state**: gauges live in a [`ModemMetrics`] value, not a global registry

mod collector;
mod gauge;

pub mod prometheus;

pub use collector::{ModemCollector, DEFAULT_COLLECT_TIMEOUT};
pub use gauge::{Families, GaugeVec, ModemMetrics, Series, StaleChannelPolicy};

// Re-export types for convenience
pub use sb8200_types::{DownstreamChannelReading, Snapshot, UpstreamChannelReading};
