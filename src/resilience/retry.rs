use super::RetryPolicy;
use crate::core::Record;
use crate::error::SinkError;
use crate::sinks::MessageBusSink;
use tracing::warn;

/// Publish `record`, retrying per `policy`. Returns the last error once
/// attempts run out.
pub async fn publish_with_retry(
    bus: &dyn MessageBusSink,
    topic: &str,
    record: &Record,
    policy: &RetryPolicy,
) -> Result<(), SinkError> {
    let mut attempt = 1;
    loop {
        match bus.publish(topic, record).await {
            Ok(()) => return Ok(()),
            Err(e) => {
                attempt += 1;
                match policy.delay_before(attempt) {
                    Some(delay) => {
                        warn!(topic, attempt, ?delay, error = %e, "publish failed, retrying");
                        tokio::time::sleep(delay).await;
                    }
                    None => return Err(e),
                }
            }
        }
    }
}
