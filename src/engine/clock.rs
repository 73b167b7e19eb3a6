use std::time::{SystemTime, UNIX_EPOCH};

/// Source of tick timestamps, in whole epoch seconds.
pub trait Clock: Send + Sync {
    fn now_secs(&self) -> i64;
}

/// Wall clock truncated to the second.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}
