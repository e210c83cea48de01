//! A modem source that replays a fixed script of outcomes.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use sb8200_adapters::{AdapterError, ModemSource};
use sb8200_metrics::{DownstreamChannelReading, Snapshot, UpstreamChannelReading};

#[derive(Debug)]
pub enum Step {
    Ok(Snapshot),
    Fail(AdapterError),
    Delayed(Duration, Snapshot),
}

#[derive(Debug, Default)]
pub struct ScriptedSource {
    steps: Mutex<VecDeque<Step>>,
}

impl ScriptedSource {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
        }
    }
}

#[async_trait]
impl ModemSource for ScriptedSource {
    async fn collect(&self) -> Result<Snapshot, AdapterError> {
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Ok(snapshot)) => Ok(snapshot),
            Some(Step::Fail(err)) => Err(err),
            Some(Step::Delayed(delay, snapshot)) => {
                tokio::time::sleep(delay).await;
                Ok(snapshot)
            }
            None => Err(AdapterError::Connection("script exhausted".to_string())),
        }
    }

    fn description(&self) -> &str {
        "scripted"
    }
}

pub fn downstream(channel: i64, power: f64) -> DownstreamChannelReading {
    DownstreamChannelReading {
        channel,
        modulation: 256,
        freq_hz: 549_000_000.0,
        power_dbmv: power,
        snr_db: 38.2,
        correcteds: 12,
        uncorrectables: 0,
    }
}

pub fn upstream(channel: i64, power: f64) -> UpstreamChannelReading {
    UpstreamChannelReading {
        channel,
        width_hz: 6_400_000,
        freq_hz: 36_000_000,
        power_dbmv: power,
    }
}

pub fn snapshot(power: f64) -> Snapshot {
    Snapshot::builder()
        .downstream(downstream(3, power))
        .upstream(upstream(2, power + 40.0))
        .build()
}
