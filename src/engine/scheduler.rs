use super::clock::{Clock, SystemClock};
use crate::config::GeneratorConfig;
use crate::core::{ChannelSet, ChannelValue, Record};
use crate::observability::TickMetrics;
use crate::resilience::{publish_with_retry, RetryPolicy};
use crate::sinks::{format_metric_line, MessageBusSink, MetricsSink};
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Outcome of one tick.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub timestamp: i64,
    pub record: Record,
    pub values: Vec<ChannelValue>,
    /// Metric lines that could not be delivered
    pub metric_failures: usize,
}

/// Drives the publish loop: sample, publish, report metrics, sleep.
///
/// Pacing is a plain sleep after each tick, so the real interval is the
/// period plus however long the tick took.
pub struct PublishScheduler {
    channels: Box<dyn ChannelSet>,
    bus: Arc<dyn MessageBusSink>,
    metrics_sink: Option<Arc<dyn MetricsSink>>,
    clock: Box<dyn Clock>,
    rng: StdRng,
    period: Duration,
    retry: RetryPolicy,
    metrics: Arc<TickMetrics>,
    last_timestamp: Option<i64>,
}

impl PublishScheduler {
    pub fn new(channels: Box<dyn ChannelSet>, bus: Arc<dyn MessageBusSink>, period: Duration) -> Self {
        Self {
            channels,
            bus,
            metrics_sink: None,
            clock: Box::new(SystemClock),
            rng: StdRng::from_os_rng(),
            period,
            retry: RetryPolicy::Never,
            metrics: Arc::new(TickMetrics::new()),
            last_timestamp: None,
        }
    }

    /// Scheduler wired up from validated configuration.
    pub fn from_config(
        config: &GeneratorConfig,
        channels: Box<dyn ChannelSet>,
        bus: Arc<dyn MessageBusSink>,
        metrics_sink: Option<Arc<dyn MetricsSink>>,
    ) -> Self {
        let mut scheduler = Self::new(channels, bus, config.period).with_retry(config.retry.clone());
        scheduler.metrics_sink = metrics_sink;
        if let Some(seed) = config.seed {
            scheduler = scheduler.with_seed(seed);
        }
        scheduler
    }

    pub fn with_metrics_sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.metrics_sink = Some(sink);
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn metrics(&self) -> Arc<TickMetrics> {
        self.metrics.clone()
    }

    /// Run one tick without the trailing sleep.
    ///
    /// Bus failures (after retries) are returned. Metric sink failures are
    /// logged and counted only.
    pub async fn tick(&mut self) -> Result<TickReport> {
        let start = self.metrics.start_tick();

        // never step backwards, even if the wall clock does
        let now = self.clock.now_secs();
        let timestamp = match self.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_timestamp = Some(timestamp);

        let (record, values) = self.channels.produce_record(timestamp, &mut self.rng);
        debug!(timestamp, ?record, "record assembled");

        let topic = self.channels.topic();
        if let Err(e) = publish_with_retry(self.bus.as_ref(), topic, &record, &self.retry).await {
            self.metrics.record_publish_error();
            return Err(e).with_context(|| format!("failed to publish record to topic '{}'", topic));
        }
        self.metrics.record_published();

        let metric_failures = match &self.metrics_sink {
            Some(sink) => self.send_metrics(sink.as_ref(), timestamp, &values).await,
            None => 0,
        };

        if let Err(e) = self.bus.flush().await {
            self.metrics.record_publish_error();
            return Err(e).context("failed to flush message bus");
        }

        self.metrics.finish_tick(start);
        Ok(TickReport {
            timestamp,
            record,
            values,
            metric_failures,
        })
    }

    async fn send_metrics(&self, sink: &dyn MetricsSink, timestamp: i64, values: &[ChannelValue]) -> usize {
        let prefix = self.channels.metric_prefix();
        let mut failures = 0;

        for v in values {
            let line = format_metric_line(prefix, &v.name, v.value, timestamp);
            debug!(metric = %format!("{}.{}", prefix, v.name), timestamp, value = v.value, "sending metric");

            match sink.send_line(&line).await {
                Ok(()) => self.metrics.record_metric_sent(),
                Err(e) => {
                    failures += 1;
                    self.metrics.record_metric_error();
                    warn!(metric = %v.name, error = %e, "failed to send metric line");
                }
            }
        }
        failures
    }

    /// Tick until `shutdown` resolves or the bus fails.
    ///
    /// Shutdown is observed between ticks, never in the middle of one. A
    /// shutdown that is already complete stops the loop before any tick.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(
            topic = self.channels.topic(),
            period = ?self.period,
            metrics = self.metrics_sink.is_some(),
            "publish loop started"
        );

        loop {
            // polling before the first tick arms listeners such as ctrl_c
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = std::future::ready(()) => {}
            }

            if let Err(e) = self.tick().await {
                error!(error = %format!("{:#}", e), "publish loop aborted");
                return Err(e);
            }

            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(self.period) => {}
            }
        }

        let snapshot = self.metrics.snapshot();
        info!(
            ticks = snapshot.ticks,
            published = snapshot.records_published,
            metric_errors = snapshot.metric_errors,
            "publish loop stopped"
        );
        Ok(())
    }

    /// Tick until Ctrl-C.
    pub async fn run(&mut self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "cannot listen for Ctrl-C, running until killed");
                std::future::pending::<()>().await;
            }
            info!("interrupt received");
        })
        .await
    }
}
