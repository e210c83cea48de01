//! Per-channel signal readings.

/// Modulation value reported when the modem shows `Other` instead of a
/// QAM order.
pub const MODULATION_OTHER: i64 = -1;

/// Signal statistics for one downstream (receive) channel.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DownstreamChannelReading {
    /// Channel ID assigned by the modem.
    pub channel: i64,

    /// QAM order (e.g. 256), or [`MODULATION_OTHER`].
    pub modulation: i64,

    /// Center frequency in Hz.
    pub freq_hz: f64,

    /// Receive power in dBmV.
    pub power_dbmv: f64,

    /// Signal-to-noise ratio in dB.
    pub snr_db: f64,

    /// Codewords corrected since the modem came up.
    pub correcteds: i64,

    /// Codewords that could not be corrected since the modem came up.
    pub uncorrectables: i64,
}

impl DownstreamChannelReading {
    /// Whether the modem reported an unrecognized modulation scheme.
    pub fn is_other_modulation(&self) -> bool {
        self.modulation == MODULATION_OTHER
    }
}

/// Signal statistics for one upstream (transmit) channel.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpstreamChannelReading {
    /// Channel ID assigned by the modem.
    pub channel: i64,

    /// Channel width in Hz.
    pub width_hz: i64,

    /// Center frequency in Hz.
    pub freq_hz: i64,

    /// Transmit power in dBmV.
    pub power_dbmv: f64,
}
