mod common;

use common::{FlakyBus, FlushFailingBus, RecordingBus, RecordingMetrics, ScriptedClock};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use telemetry_gen::engine::PublishScheduler;
use telemetry_gen::nodes::AttitudeChannelSet;
use telemetry_gen::resilience::RetryPolicy;
use telemetry_gen::sinks::CarbonSink;
use tokio::net::TcpListener;

fn attitude() -> Box<AttitudeChannelSet> {
    Box::new(AttitudeChannelSet::new().unwrap())
}

#[tokio::test]
async fn test_tick_publishes_and_reports_metrics() {
    let bus = Arc::new(RecordingBus::default());
    let metrics = Arc::new(RecordingMetrics::default());
    let mut scheduler = PublishScheduler::new(attitude(), bus.clone(), Duration::from_secs(1))
        .with_metrics_sink(metrics.clone())
        .with_clock(Box::new(ScriptedClock::new(vec![1000])))
        .with_seed(1);

    let report = scheduler.tick().await.unwrap();

    assert_eq!(report.timestamp, 1000);
    assert_eq!(report.metric_failures, 0);
    assert_eq!(bus.records(), vec![report.record.clone()]);
    assert_eq!(bus.flushes.load(Ordering::SeqCst), 1);

    let expected: Vec<String> = report
        .values
        .iter()
        .map(|v| format!("gen.{} {} 1000\n", v.name, v.value))
        .collect();
    assert_eq!(metrics.lines(), expected);
    assert!(metrics.lines()[0].starts_with("gen.phi "));
}

#[tokio::test]
async fn test_timestamps_never_decrease() {
    let bus = Arc::new(RecordingBus::default());
    let clock = ScriptedClock::new(vec![100, 101, 99, 95, 101, 102, 50, 103]);
    let mut scheduler = PublishScheduler::new(attitude(), bus.clone(), Duration::from_millis(1))
        .with_clock(Box::new(clock));

    let mut stamps = Vec::new();
    for _ in 0..8 {
        stamps.push(scheduler.tick().await.unwrap().timestamp);
    }

    assert_eq!(stamps, vec![100, 101, 101, 101, 101, 102, 102, 103]);
    let times: Vec<i64> = bus.records().iter().map(|r| r.header.time).collect();
    assert_eq!(times, stamps);
}

#[tokio::test]
async fn test_unreachable_metrics_sink_does_not_stop_ticks() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let bus = Arc::new(RecordingBus::default());
    let carbon = CarbonSink::new(addr.to_string()).with_timeout(Duration::from_secs(2));
    let mut scheduler = PublishScheduler::new(attitude(), bus.clone(), Duration::from_millis(1))
        .with_metrics_sink(Arc::new(carbon));

    let first = scheduler.tick().await.unwrap();
    let second = scheduler.tick().await.unwrap();

    assert_eq!(first.metric_failures, 3);
    assert_eq!(second.metric_failures, 3);
    assert_eq!(bus.records().len(), 2);

    let snapshot = scheduler.metrics().snapshot();
    assert_eq!(snapshot.ticks, 2);
    assert_eq!(snapshot.metric_errors, 6);
    assert_eq!(snapshot.metric_lines_sent, 0);
}

#[tokio::test]
async fn test_publish_failure_is_fatal_by_default() {
    let bus = Arc::new(FlakyBus::always_failing());
    let mut scheduler = PublishScheduler::new(attitude(), bus.clone(), Duration::from_millis(10));

    let err = scheduler.run_until(std::future::pending()).await.unwrap_err();

    assert!(format!("{:#}", err).contains("broker unavailable"));
    assert_eq!(bus.attempts.load(Ordering::SeqCst), 1);
    assert_eq!(scheduler.metrics().snapshot().publish_errors, 1);
    assert_eq!(scheduler.metrics().ticks(), 0);
}

#[tokio::test]
async fn test_flush_failure_is_fatal() {
    let bus = Arc::new(FlushFailingBus::default());
    let mut scheduler = PublishScheduler::new(attitude(), bus.clone(), Duration::from_millis(10));

    let err = scheduler.tick().await.unwrap_err();

    let message = format!("{:#}", err);
    assert!(message.contains("failed to flush message bus"), "{}", message);
    assert!(message.contains("flush timed out"), "{}", message);
    assert_eq!(bus.published.load(Ordering::SeqCst), 1);

    let snapshot = scheduler.metrics().snapshot();
    assert_eq!(snapshot.publish_errors, 1);
    assert_eq!(snapshot.ticks, 0);
}

#[tokio::test]
async fn test_completed_shutdown_stops_before_first_tick() {
    let bus = Arc::new(RecordingBus::default());
    let mut scheduler = PublishScheduler::new(attitude(), bus.clone(), Duration::from_millis(10));

    scheduler.run_until(std::future::ready(())).await.unwrap();

    assert!(bus.records().is_empty());
    assert_eq!(scheduler.metrics().ticks(), 0);
}

#[tokio::test]
async fn test_publish_retries_before_giving_up() {
    let bus = Arc::new(FlakyBus::new(2));
    let mut scheduler = PublishScheduler::new(attitude(), bus.clone(), Duration::from_millis(10))
        .with_retry(RetryPolicy::exponential(2, 1));

    scheduler.tick().await.unwrap();
    assert_eq!(bus.attempts.load(Ordering::SeqCst), 3);

    let bus = Arc::new(FlakyBus::new(5));
    let mut scheduler = PublishScheduler::new(attitude(), bus.clone(), Duration::from_millis(10))
        .with_retry(RetryPolicy::exponential(2, 1));

    assert!(scheduler.tick().await.is_err());
    assert_eq!(bus.attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_run_paces_ticks_at_configured_frequency() {
    let bus = Arc::new(RecordingBus::default());
    let frequency = 2.0;
    let mut scheduler = PublishScheduler::new(
        attitude(),
        bus.clone(),
        Duration::from_secs_f64(1.0 / frequency),
    );

    scheduler
        .run_until(tokio::time::sleep(Duration::from_millis(1_700)))
        .await
        .unwrap();

    let arrivals = bus.arrivals();
    assert!(arrivals.len() >= 3 && arrivals.len() <= 5, "got {} ticks", arrivals.len());
    for pair in arrivals.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_millis(450));
    }

    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as i64;
    let records = bus.records();
    for pair in records.windows(2) {
        assert!(pair[1].header.time >= pair[0].header.time);
    }
    for record in &records {
        assert!(record.header.time > 1_600_000_000 && record.header.time <= now);
    }
}

#[tokio::test]
async fn test_seeded_schedulers_agree() {
    let run = |seed| async move {
        let bus = Arc::new(RecordingBus::default());
        let mut scheduler = PublishScheduler::new(attitude(), bus.clone(), Duration::from_millis(1))
            .with_clock(Box::new(ScriptedClock::new(vec![500, 501, 502])))
            .with_seed(seed);
        for _ in 0..3 {
            scheduler.tick().await.unwrap();
        }
        bus.records()
    };

    assert_eq!(run(9).await, run(9).await);
}
