//! # sb8200-types
//!
//! Core types for cable modem signal statistics. This crate defines the
//! per-channel readings scraped from an SB8200 status page and the
//! [`Snapshot`] that groups one page's worth of them.
//!
//! ## Features
//!
//! - `serde`: JSON/etc. serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use sb8200_types::{DownstreamChannelReading, Snapshot, UpstreamChannelReading};
//!
//! let snapshot = Snapshot::builder()
//!     .downstream(DownstreamChannelReading {
//!         channel: 3,
//!         modulation: 256,
//!         freq_hz: 549_000_000.0,
//!         power_dbmv: 0.6,
//!         snr_db: 38.2,
//!         correcteds: 12,
//!         uncorrectables: 0,
//!     })
//!     .upstream(UpstreamChannelReading {
//!         channel: 1,
//!         width_hz: 6_400_000,
//!         freq_hz: 36_000_000,
//!         power_dbmv: 44.0,
//!     })
//!     .build();
//!
//! assert_eq!(snapshot.downstream.len(), 1);
//! assert_eq!(snapshot.get_upstream(1).map(|u| u.width_hz), Some(6_400_000));
//! ```

mod reading;
mod snapshot;

pub use reading::*;
pub use snapshot::*;
