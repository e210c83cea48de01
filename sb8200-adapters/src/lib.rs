//! # sb8200-adapters
//!
//! Collects cable modem signal readings by scraping the Arris SB8200
//! connection status page.
//!
//! The pipeline is fetch → extract → coerce:
//!
//! - [`sb8200`]: HTTP fetch of the status page with a bounded body
//! - [`extract`]: locates the downstream and upstream tables and reads rows
//! - [`layout`]: which tables, rows and cells hold which fields
//! - [`coerce`]: turns cell text like `0.6 dBmV` or `QAM256` into numbers
//!
//! Any failure along the way fails the whole collection; a partial snapshot
//! is never returned.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sb8200_adapters::{ModemSource, sb8200::Sb8200Adapter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = Sb8200Adapter::builder().build()?;
//!
//!     let snapshot = adapter.collect().await?;
//!
//!     println!("Collected {} downstream channels", snapshot.downstream.len());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;

pub mod coerce;
pub mod error;
pub mod extract;
pub mod layout;
pub mod sb8200;

pub use error::{AdapterError, CoerceError, ErrorKind};

// Re-export types for convenience
pub use sb8200_types::{DownstreamChannelReading, Snapshot, UpstreamChannelReading};

/// A source of modem snapshots.
///
/// Implemented by [`sb8200::Sb8200Adapter`]; the metrics collector only
/// depends on this trait.
#[async_trait]
pub trait ModemSource: Send + Sync {
    /// Perform one full fetch-and-extract cycle.
    async fn collect(&self) -> Result<Snapshot, AdapterError>;

    /// Human-readable description of the source, used in logs.
    fn description(&self) -> &str;

    /// Like [`collect`](Self::collect), but gives up after `timeout`.
    ///
    /// The in-flight request is dropped when the deadline passes and the
    /// result is [`AdapterError::Timeout`].
    async fn collect_within(&self, timeout: Duration) -> Result<Snapshot, AdapterError> {
        tokio::time::timeout(timeout, self.collect())
            .await
            .map_err(|_| AdapterError::Timeout)?
    }
}
