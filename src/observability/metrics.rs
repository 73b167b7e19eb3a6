use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Counters for the publish loop, shared with whoever wants to read them.
#[derive(Debug, Default)]
pub struct TickMetrics {
    ticks: AtomicU64,
    records_published: AtomicU64,
    publish_errors: AtomicU64,
    metric_lines_sent: AtomicU64,
    metric_errors: AtomicU64,
    total_latency_us: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub records_published: u64,
    pub publish_errors: u64,
    pub metric_lines_sent: u64,
    pub metric_errors: u64,
    pub avg_tick_latency_us: u64,
}

impl TickMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_tick(&self) -> Instant {
        Instant::now()
    }

    pub fn finish_tick(&self, start: Instant) {
        let latency_us = start.elapsed().as_micros() as u64;
        self.total_latency_us.fetch_add(latency_us, Ordering::Relaxed);
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_published(&self) {
        self.records_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_publish_error(&self) {
        self.publish_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_metric_sent(&self) {
        self.metric_lines_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_metric_error(&self) {
        self.metric_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn avg_tick_latency_us(&self) -> u64 {
        let ticks = self.ticks();
        if ticks == 0 {
            return 0;
        }
        self.total_latency_us.load(Ordering::Relaxed) / ticks
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks: self.ticks(),
            records_published: self.records_published.load(Ordering::Relaxed),
            publish_errors: self.publish_errors.load(Ordering::Relaxed),
            metric_lines_sent: self.metric_lines_sent.load(Ordering::Relaxed),
            metric_errors: self.metric_errors.load(Ordering::Relaxed),
            avg_tick_latency_us: self.avg_tick_latency_us(),
        }
    }
}
