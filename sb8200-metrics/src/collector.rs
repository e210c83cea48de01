//! Scrape-driven collection: one fetch-and-extract cycle per call.

use std::sync::Arc;
use std::time::{Duration, Instant};

use sb8200_adapters::{AdapterError, ModemSource};
use tracing::{debug, warn};

use crate::gauge::{ModemMetrics, StaleChannelPolicy};

/// Hard limit on one collection cycle.
pub const DEFAULT_COLLECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Refreshes [`ModemMetrics`] from a [`ModemSource`] on demand.
#[derive(Debug)]
pub struct ModemCollector<S> {
    source: S,
    metrics: Arc<ModemMetrics>,
    timeout: Duration,
    stale_policy: StaleChannelPolicy,
}

impl<S: ModemSource> ModemCollector<S> {
    /// Create a collector with fresh, empty metrics.
    pub fn new(source: S) -> Self {
        Self::with_metrics(source, Arc::new(ModemMetrics::new()))
    }

    /// Create a collector that writes into existing metrics.
    pub fn with_metrics(source: S, metrics: Arc<ModemMetrics>) -> Self {
        Self {
            source,
            metrics,
            timeout: DEFAULT_COLLECT_TIMEOUT,
            stale_policy: StaleChannelPolicy::default(),
        }
    }

    /// Set the per-cycle timeout (default: 30 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set what happens to channels missing from a new snapshot.
    pub fn stale_policy(mut self, policy: StaleChannelPolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    pub fn metrics(&self) -> &Arc<ModemMetrics> {
        &self.metrics
    }

    /// Run one collection cycle and publish its readings.
    ///
    /// On error no series is touched.
    pub async fn collect(&self) -> Result<(), AdapterError> {
        let started = Instant::now();

        match self.source.collect_within(self.timeout).await {
            Ok(snapshot) => {
                self.metrics.apply(&snapshot, self.stale_policy);
                debug!(
                    source = self.source.description(),
                    downstream = snapshot.downstream.len(),
                    upstream = snapshot.upstream.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "collection succeeded"
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    source = self.source.description(),
                    kind = %err.kind(),
                    error = %err,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "collection failed"
                );
                Err(err)
            }
        }
    }
}
