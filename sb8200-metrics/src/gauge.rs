//! Label-keyed gauge storage for the modem series.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use parking_lot::{RwLock, RwLockReadGuard};
use sb8200_types::Snapshot;

/// The nine series exported per modem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Series {
    DownstreamFreq,
    DownstreamPower,
    DownstreamSnr,
    DownstreamModulation,
    DownstreamCorrecteds,
    DownstreamUncorrectables,
    UpstreamFreq,
    UpstreamPower,
    UpstreamWidth,
}

impl Series {
    /// All series, in exposition order.
    pub const ALL: [Series; 9] = [
        Series::DownstreamFreq,
        Series::DownstreamPower,
        Series::DownstreamSnr,
        Series::DownstreamModulation,
        Series::DownstreamCorrecteds,
        Series::DownstreamUncorrectables,
        Series::UpstreamFreq,
        Series::UpstreamPower,
        Series::UpstreamWidth,
    ];

    pub const DOWNSTREAM: [Series; 6] = [
        Series::DownstreamFreq,
        Series::DownstreamPower,
        Series::DownstreamSnr,
        Series::DownstreamModulation,
        Series::DownstreamCorrecteds,
        Series::DownstreamUncorrectables,
    ];

    pub const UPSTREAM: [Series; 3] = [
        Series::UpstreamFreq,
        Series::UpstreamPower,
        Series::UpstreamWidth,
    ];

    /// Metric name without namespace.
    pub fn name(&self) -> &'static str {
        match self {
            Series::DownstreamFreq => "downstream_freq_hertz",
            Series::DownstreamPower => "downstream_power_dbmv",
            Series::DownstreamSnr => "downstream_snr_db",
            Series::DownstreamModulation => "downstream_modulation_qam",
            Series::DownstreamCorrecteds => "downstream_correcteds_total",
            Series::DownstreamUncorrectables => "downstream_uncorrectables_total",
            Series::UpstreamFreq => "upstream_freq_hertz",
            Series::UpstreamPower => "upstream_power_dbmv",
            Series::UpstreamWidth => "upstream_width_hertz",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            Series::DownstreamFreq => "Modem Downstream Frequency (Hz)",
            Series::DownstreamPower => "Modem Downstream Power (dBmV)",
            Series::DownstreamSnr => "Modem Downstream SNR (dB)",
            Series::DownstreamModulation => "Modem Downstream Modulation (QAM)",
            Series::DownstreamCorrecteds => "Modem Downstream Correcteds",
            Series::DownstreamUncorrectables => "Modem Downstream Uncorrectables",
            Series::UpstreamFreq => "Modem Upstream Frequency (Hz)",
            Series::UpstreamPower => "Modem Upstream Power (dBmV)",
            Series::UpstreamWidth => "Modem Upstream Channel Width (Hz)",
        }
    }

    /// Name of the channel label.
    pub fn label(&self) -> &'static str {
        if Series::UPSTREAM.contains(self) {
            "upstream"
        } else {
            "downstream"
        }
    }
}

/// One gauge family: a value per channel.
#[derive(Debug, Clone)]
pub struct GaugeVec {
    series: Series,
    values: BTreeMap<i64, f64>,
}

impl GaugeVec {
    pub fn new(series: Series) -> Self {
        Self {
            series,
            values: BTreeMap::new(),
        }
    }

    pub fn series(&self) -> Series {
        self.series
    }

    pub fn set(&mut self, channel: i64, value: f64) {
        self.values.insert(channel, value);
    }

    pub fn get(&self, channel: i64) -> Option<f64> {
        self.values.get(&channel).copied()
    }

    /// Drop every channel for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(i64) -> bool) {
        self.values.retain(|channel, _| keep(*channel));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(channel, value)` pairs in channel order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.values.iter().map(|(c, v)| (*c, *v))
    }
}

/// What happens to a channel that was in an earlier snapshot but is missing
/// from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaleChannelPolicy {
    /// Keep exporting the last value seen.
    Retain,
    /// Stop exporting the channel.
    #[default]
    Remove,
}

impl FromStr for StaleChannelPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(StaleChannelPolicy::Retain),
            "remove" => Ok(StaleChannelPolicy::Remove),
            other => Err(format!(
                "unknown stale channel policy '{}' (expected 'retain' or 'remove')",
                other
            )),
        }
    }
}

impl fmt::Display for StaleChannelPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaleChannelPolicy::Retain => f.write_str("retain"),
            StaleChannelPolicy::Remove => f.write_str("remove"),
        }
    }
}

/// All gauge families, indexable by [`Series`].
#[derive(Debug, Clone)]
pub struct Families(Vec<GaugeVec>);

impl Families {
    fn new() -> Self {
        Self(Series::ALL.iter().copied().map(GaugeVec::new).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &GaugeVec> {
        self.0.iter()
    }
}

impl Index<Series> for Families {
    type Output = GaugeVec;

    fn index(&self, series: Series) -> &GaugeVec {
        &self.0[series as usize]
    }
}

impl IndexMut<Series> for Families {
    fn index_mut(&mut self, series: Series) -> &mut GaugeVec {
        &mut self.0[series as usize]
    }
}

/// Gauge state for one modem.
///
/// Constructed once at startup and shared by `Arc` between the collector
/// that writes it and the HTTP handler that renders it.
#[derive(Debug)]
pub struct ModemMetrics {
    families: RwLock<Families>,
}

impl ModemMetrics {
    pub fn new() -> Self {
        Self {
            families: RwLock::new(Families::new()),
        }
    }

    /// Overwrite every series with the readings in `snapshot`.
    ///
    /// The whole snapshot is applied under one write lock, so readers see
    /// either the previous state or the new one.
    pub fn apply(&self, snapshot: &Snapshot, policy: StaleChannelPolicy) {
        let mut families = self.families.write();

        if policy == StaleChannelPolicy::Remove {
            let downstream: BTreeSet<i64> = snapshot.downstream.iter().map(|d| d.channel).collect();
            let upstream: BTreeSet<i64> = snapshot.upstream.iter().map(|u| u.channel).collect();
            for series in Series::DOWNSTREAM {
                families[series].retain(|c| downstream.contains(&c));
            }
            for series in Series::UPSTREAM {
                families[series].retain(|c| upstream.contains(&c));
            }
        }

        for ds in &snapshot.downstream {
            let ch = ds.channel;
            families[Series::DownstreamFreq].set(ch, ds.freq_hz);
            families[Series::DownstreamPower].set(ch, ds.power_dbmv);
            families[Series::DownstreamSnr].set(ch, ds.snr_db);
            families[Series::DownstreamModulation].set(ch, ds.modulation as f64);
            families[Series::DownstreamCorrecteds].set(ch, ds.correcteds as f64);
            families[Series::DownstreamUncorrectables].set(ch, ds.uncorrectables as f64);
        }

        for us in &snapshot.upstream {
            let ch = us.channel;
            families[Series::UpstreamFreq].set(ch, us.freq_hz as f64);
            families[Series::UpstreamPower].set(ch, us.power_dbmv);
            families[Series::UpstreamWidth].set(ch, us.width_hz as f64);
        }
    }

    /// Current value of one series for one channel.
    pub fn get(&self, series: Series, channel: i64) -> Option<f64> {
        self.families.read()[series].get(channel)
    }

    /// Read access to all families, e.g. for rendering.
    pub fn read(&self) -> RwLockReadGuard<'_, Families> {
        self.families.read()
    }

    /// Whether no series holds any value yet.
    pub fn is_empty(&self) -> bool {
        self.families.read().iter().all(|f| f.is_empty())
    }
}

impl Default for ModemMetrics {
    fn default() -> Self {
        Self::new()
    }
}
