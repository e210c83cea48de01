//! # sb8200-exporter
//!
//! A Prometheus exporter for the Arris SB8200 cable modem.
//!
//! Each scrape of the metrics endpoint fetches the modem's
//! `cmconnectionstatus.html`, pulls per-channel readings out of its
//! downstream and upstream tables, and serves them as gauges:
//!
//! ```text
//! scrape ──▶ sb8200-metrics ──▶ sb8200-adapters ──▶ modem
//!            (gauges, HTTP)     (fetch, extract)
//! ```
//!
//! - [`sb8200_types`]: channel readings and snapshots
//! - [`sb8200_adapters`]: page fetch, table extraction, cell coercion
//! - [`sb8200_metrics`]: gauge store, collector, Prometheus endpoint
//!
//! This crate adds the process around them: [`settings`] for layered
//! configuration and [`export`] for one-shot JSON dumps.
//!
//! ## Usage
//!
//! ```bash
//! # Serve metrics on :9292 for the modem at its default address
//! sb8200-exporter
//!
//! # Different modem URL and listen address
//! sb8200-exporter --modem-url http://10.0.0.1/cmconnectionstatus.html --metrics-addr :9300
//!
//! # Dump one snapshot as JSON and exit
//! sb8200-exporter --export snapshot.json
//! ```

pub mod export;
pub mod settings;

pub use settings::{Overrides, Settings};
