#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Instant;
use telemetry_gen::core::Record;
use telemetry_gen::engine::Clock;
use telemetry_gen::error::SinkError;
use telemetry_gen::sinks::{MessageBusSink, MetricsSink, RecordSchema};

pub const ATTITUDE_SCHEMA: &str = include_str!("../../schemas/hmod_Attitude.avsc");

pub fn attitude_schema() -> RecordSchema {
    RecordSchema::parse(ATTITUDE_SCHEMA).unwrap()
}

/// Keeps every published record along with when it arrived.
#[derive(Default)]
pub struct RecordingBus {
    pub published: Mutex<Vec<(String, Record, Instant)>>,
    pub flushes: AtomicUsize,
}

impl RecordingBus {
    pub fn records(&self) -> Vec<Record> {
        self.published.lock().unwrap().iter().map(|(_, r, _)| r.clone()).collect()
    }

    pub fn arrivals(&self) -> Vec<Instant> {
        self.published.lock().unwrap().iter().map(|(_, _, t)| *t).collect()
    }
}

#[async_trait]
impl MessageBusSink for RecordingBus {
    async fn publish(&self, topic: &str, record: &Record) -> Result<(), SinkError> {
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), record.clone(), Instant::now()));
        Ok(())
    }

    async fn flush(&self) -> Result<(), SinkError> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Fails the first `failures` publishes, then accepts.
pub struct FlakyBus {
    failures: usize,
    pub attempts: AtomicUsize,
}

impl FlakyBus {
    pub fn new(failures: usize) -> Self {
        Self {
            failures,
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn always_failing() -> Self {
        Self::new(usize::MAX)
    }
}

#[async_trait]
impl MessageBusSink for FlakyBus {
    async fn publish(&self, _topic: &str, _record: &Record) -> Result<(), SinkError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures {
            Err(SinkError::Other("broker unavailable".to_string()))
        } else {
            Ok(())
        }
    }

    async fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingMetrics {
    pub lines: Mutex<Vec<String>>,
}

impl RecordingMetrics {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetricsSink for RecordingMetrics {
    async fn send_line(&self, line: &str) -> Result<(), SinkError> {
        self.lines.lock().unwrap().push(line.to_string());
        Ok(())
    }
}

/// Clock that replays a fixed list of readings, repeating the last one.
pub struct ScriptedClock {
    readings: Vec<i64>,
    next: AtomicUsize,
}

impl ScriptedClock {
    pub fn new(readings: Vec<i64>) -> Self {
        Self {
            readings,
            next: AtomicUsize::new(0),
        }
    }
}

impl Clock for ScriptedClock {
    fn now_secs(&self) -> i64 {
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        self.readings[i.min(self.readings.len() - 1)]
    }
}

/// Accepts every publish but fails to flush.
#[derive(Default)]
pub struct FlushFailingBus {
    pub published: AtomicUsize,
}

#[async_trait]
impl MessageBusSink for FlushFailingBus {
    async fn publish(&self, _topic: &str, _record: &Record) -> Result<(), SinkError> {
        self.published.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn flush(&self) -> Result<(), SinkError> {
        Err(SinkError::Other("flush timed out".to_string()))
    }
}
