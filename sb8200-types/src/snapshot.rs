//! Snapshot - every channel reading taken from one status page fetch.

use crate::{DownstreamChannelReading, UpstreamChannelReading};

/// All channel readings produced by a single fetch of the modem status page.
///
/// Readings keep the row order of the source tables. A snapshot is built
/// whole or not at all: the extractor never hands out a partially parsed one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// Unix timestamp in milliseconds when this snapshot was taken.
    pub timestamp_ms: u64,

    /// Downstream channels, in table order.
    pub downstream: Vec<DownstreamChannelReading>,

    /// Upstream channels, in table order.
    pub upstream: Vec<UpstreamChannelReading>,
}

impl Snapshot {
    /// Create an empty snapshot stamped with the current time.
    pub fn new() -> Self {
        Self::with_timestamp(current_timestamp_ms())
    }

    /// Create an empty snapshot with a specific timestamp.
    pub fn with_timestamp(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            downstream: Vec::new(),
            upstream: Vec::new(),
        }
    }

    /// Create a builder for constructing snapshots.
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::new()
    }

    /// Check if the snapshot holds no channels at all.
    pub fn is_empty(&self) -> bool {
        self.downstream.is_empty() && self.upstream.is_empty()
    }

    /// Find a downstream reading by channel ID.
    pub fn get_downstream(&self, channel: i64) -> Option<&DownstreamChannelReading> {
        self.downstream.iter().find(|d| d.channel == channel)
    }

    /// Find an upstream reading by channel ID.
    pub fn get_upstream(&self, channel: i64) -> Option<&UpstreamChannelReading> {
        self.upstream.iter().find(|u| u.channel == channel)
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing `Snapshot` instances.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    timestamp_ms: Option<u64>,
    downstream: Vec<DownstreamChannelReading>,
    upstream: Vec<UpstreamChannelReading>,
}

impl SnapshotBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a specific timestamp (milliseconds since Unix epoch).
    pub fn timestamp_ms(mut self, ts: u64) -> Self {
        self.timestamp_ms = Some(ts);
        self
    }

    /// Append a downstream reading.
    pub fn downstream(mut self, reading: DownstreamChannelReading) -> Self {
        self.downstream.push(reading);
        self
    }

    /// Append an upstream reading.
    pub fn upstream(mut self, reading: UpstreamChannelReading) -> Self {
        self.upstream.push(reading);
        self
    }

    /// Build the snapshot.
    pub fn build(self) -> Snapshot {
        Snapshot {
            timestamp_ms: self.timestamp_ms.unwrap_or_else(current_timestamp_ms),
            downstream: self.downstream,
            upstream: self.upstream,
        }
    }
}

/// Get current timestamp in milliseconds since Unix epoch.
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn downstream(channel: i64) -> DownstreamChannelReading {
        DownstreamChannelReading {
            channel,
            modulation: 256,
            freq_hz: 549_000_000.0,
            power_dbmv: 0.6,
            snr_db: 38.2,
            correcteds: 12,
            uncorrectables: 0,
        }
    }

    #[test]
    fn test_snapshot_builder_keeps_order() {
        let snapshot = Snapshot::builder()
            .timestamp_ms(1703160000000)
            .downstream(downstream(7))
            .downstream(downstream(3))
            .upstream(UpstreamChannelReading {
                channel: 2,
                width_hz: 6_400_000,
                freq_hz: 29_200_000,
                power_dbmv: 43.5,
            })
            .build();

        assert_eq!(snapshot.timestamp_ms, 1703160000000);
        let channels: Vec<i64> = snapshot.downstream.iter().map(|d| d.channel).collect();
        assert_eq!(channels, vec![7, 3]);
        assert_eq!(snapshot.get_downstream(3), Some(&downstream(3)));
        assert!(snapshot.get_downstream(4).is_none());
        assert_eq!(snapshot.get_upstream(2).map(|u| u.freq_hz), Some(29_200_000));
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::builder().build();
        assert!(snapshot.is_empty());
        assert!(snapshot.timestamp_ms > 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_field_names() {
        let snapshot = Snapshot::builder()
            .timestamp_ms(1703160000000)
            .downstream(downstream(3))
            .build();

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["timestamp_ms"], 1703160000000u64);
        assert_eq!(json["downstream"][0]["channel"], 3);
        assert_eq!(json["downstream"][0]["snr_db"], 38.2);
        assert!(json["upstream"].as_array().unwrap().is_empty());
    }
}
