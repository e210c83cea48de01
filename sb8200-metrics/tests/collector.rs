mod common;

use std::time::Duration;

use sb8200_adapters::{AdapterError, ErrorKind};
use sb8200_metrics::{ModemCollector, Series, StaleChannelPolicy, DEFAULT_COLLECT_TIMEOUT};

use common::{downstream, snapshot, ScriptedSource, Step};

#[tokio::test]
async fn test_successful_cycle_updates_gauges() {
    let collector = ModemCollector::new(ScriptedSource::new([Step::Ok(snapshot(0.6))]));

    collector.collect().await.unwrap();

    let metrics = collector.metrics();
    assert_eq!(metrics.get(Series::DownstreamPower, 3), Some(0.6));
    assert_eq!(metrics.get(Series::DownstreamModulation, 3), Some(256.0));
    assert_eq!(metrics.get(Series::UpstreamPower, 2), Some(40.6));
}

#[tokio::test]
async fn test_http_failure_leaves_gauges_untouched() {
    let collector = ModemCollector::new(ScriptedSource::new([
        Step::Ok(snapshot(0.6)),
        Step::Fail(AdapterError::Http(
            "modem returned status 503 Service Unavailable".to_string(),
        )),
    ]));

    collector.collect().await.unwrap();
    let err = collector.collect().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    let metrics = collector.metrics();
    assert_eq!(metrics.get(Series::DownstreamPower, 3), Some(0.6));
    assert_eq!(metrics.get(Series::UpstreamPower, 2), Some(40.6));
}

#[tokio::test]
async fn test_failure_before_any_success_exports_nothing() {
    let collector = ModemCollector::new(ScriptedSource::new([Step::Fail(AdapterError::Layout(
        "expected at least 3 tables".to_string(),
    ))]));

    let err = collector.collect().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Layout);
    assert!(collector.metrics().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_leaves_gauges_untouched() {
    let collector = ModemCollector::new(ScriptedSource::new([
        Step::Ok(snapshot(0.6)),
        Step::Delayed(Duration::from_secs(3600), snapshot(9.9)),
    ]));

    collector.collect().await.unwrap();
    let err = collector.collect().await.unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(
        collector.metrics().get(Series::DownstreamPower, 3),
        Some(0.6)
    );
}

#[tokio::test(start_paused = true)]
async fn test_default_timeout_is_thirty_seconds() {
    assert_eq!(DEFAULT_COLLECT_TIMEOUT, Duration::from_secs(30));

    let collector = ModemCollector::new(ScriptedSource::new([
        Step::Delayed(Duration::from_secs(29), snapshot(1.0)),
        Step::Delayed(Duration::from_secs(31), snapshot(2.0)),
    ]));

    collector.collect().await.unwrap();
    assert!(collector.collect().await.unwrap_err().is_timeout());
    assert_eq!(
        collector.metrics().get(Series::DownstreamPower, 3),
        Some(1.0)
    );
}

#[tokio::test(start_paused = true)]
async fn test_custom_timeout() {
    let collector = ModemCollector::new(ScriptedSource::new([Step::Delayed(
        Duration::from_secs(2),
        snapshot(1.0),
    )]))
    .timeout(Duration::from_secs(1));

    assert!(collector.collect().await.unwrap_err().is_timeout());
}

#[tokio::test]
async fn test_stale_policy_is_applied() {
    let first = sb8200_metrics::Snapshot::builder()
        .downstream(downstream(1, 1.0))
        .downstream(downstream(2, 2.0))
        .build();
    let second = sb8200_metrics::Snapshot::builder()
        .downstream(downstream(2, 2.5))
        .build();

    let removing = ModemCollector::new(ScriptedSource::new([
        Step::Ok(first.clone()),
        Step::Ok(second.clone()),
    ]));
    removing.collect().await.unwrap();
    removing.collect().await.unwrap();
    assert_eq!(removing.metrics().get(Series::DownstreamPower, 1), None);
    assert_eq!(removing.metrics().get(Series::DownstreamPower, 2), Some(2.5));

    let retaining = ModemCollector::new(ScriptedSource::new([Step::Ok(first), Step::Ok(second)]))
        .stale_policy(StaleChannelPolicy::Retain);
    retaining.collect().await.unwrap();
    retaining.collect().await.unwrap();
    assert_eq!(retaining.metrics().get(Series::DownstreamPower, 1), Some(1.0));
    assert_eq!(retaining.metrics().get(Series::DownstreamPower, 2), Some(2.5));
}
