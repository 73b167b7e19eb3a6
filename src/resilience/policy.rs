use std::time::Duration;

/// How a failed bus publish is retried before the tick gives up.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RetryPolicy {
    /// Surface the first failure (default)
    #[default]
    Never,

    /// Exponential backoff between attempts
    Exponential {
        base_ms: u64,
        max_ms: u64,
        max_attempts: usize,
    },
}

impl RetryPolicy {
    /// `retries` extra attempts after the first, doubling from `base_ms`.
    pub fn exponential(retries: usize, base_ms: u64) -> Self {
        if retries == 0 {
            return RetryPolicy::Never;
        }
        RetryPolicy::Exponential {
            base_ms,
            max_ms: base_ms.saturating_mul(32),
            max_attempts: retries.saturating_add(1),
        }
    }

    /// Total attempts, including the first.
    pub fn max_attempts(&self) -> usize {
        match self {
            RetryPolicy::Never => 1,
            RetryPolicy::Exponential { max_attempts, .. } => (*max_attempts).max(1),
        }
    }

    /// Delay before attempt number `attempt` (1-based, so attempt 2 is the
    /// first retry). `None` once attempts are exhausted.
    pub fn delay_before(&self, attempt: usize) -> Option<Duration> {
        match self {
            RetryPolicy::Never => None,
            RetryPolicy::Exponential {
                base_ms,
                max_ms,
                max_attempts,
            } => {
                if attempt < 2 || attempt > *max_attempts {
                    return None;
                }
                let shift = (attempt - 2).min(32) as u32;
                let ms = base_ms.saturating_mul(1u64 << shift).min(*max_ms);
                Some(Duration::from_millis(ms))
            }
        }
    }
}
