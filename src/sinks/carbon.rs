use crate::error::SinkError;
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Carbon plaintext protocol port
pub const CARBON_PORT: u16 = 2003;

/// One line of the Carbon plaintext protocol.
pub fn format_metric_line(prefix: &str, metric: &str, value: f64, timestamp: i64) -> String {
    format!("{}.{} {} {}\n", prefix, metric, value, timestamp)
}

/// Receiver of metric lines.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn send_line(&self, line: &str) -> Result<(), SinkError>;
}

/// Writes each line over its own short-lived TCP connection.
pub struct CarbonSink {
    address: String,
    timeout: Duration,
}

impl CarbonSink {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Target `<host>:2003`.
    pub fn for_host(host: &str) -> Self {
        Self::new(format!("{}:{}", host, CARBON_PORT))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    async fn send(&self, line: &str) -> Result<(), SinkError> {
        let mut stream = TcpStream::connect(&self.address).await?;
        stream.write_all(line.as_bytes()).await?;
        stream.shutdown().await?;
        Ok(())
    }
}

#[async_trait]
impl MetricsSink for CarbonSink {
    async fn send_line(&self, line: &str) -> Result<(), SinkError> {
        tokio::time::timeout(self.timeout, self.send(line))
            .await
            .map_err(|_| SinkError::Timeout(self.timeout))?
    }
}
