use super::schema::RecordSchema;
use crate::core::Record;
use crate::error::SinkError;
use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// Kafka broker port on the registry host
pub const BOOTSTRAP_PORT: u16 = 9092;
/// Schema registry port on the registry host
pub const REGISTRY_PORT: u16 = 8081;

/// Addresses a bus client needs, derived from the registry host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusEndpoints {
    pub bootstrap_servers: String,
    pub schema_registry_url: String,
}

impl BusEndpoints {
    pub fn from_registry_host(host: &str) -> Self {
        Self {
            bootstrap_servers: format!("{}:{}", host, BOOTSTRAP_PORT),
            schema_registry_url: format!("http://{}:{}", host, REGISTRY_PORT),
        }
    }
}

/// Destination for validated records.
#[async_trait]
pub trait MessageBusSink: Send + Sync {
    /// Validate and enqueue `record` under `topic`.
    async fn publish(&self, topic: &str, record: &Record) -> Result<(), SinkError>;

    /// Push out anything buffered by `publish`.
    async fn flush(&self) -> Result<(), SinkError>;
}

/// Schema-checked JSON-lines publisher.
///
/// Stands in for the broker client: each record is validated against the
/// topic schema and written as one `{"topic":..,"value":..}` line.
pub struct JsonLinesBus<W> {
    schema: RecordSchema,
    writer: Mutex<W>,
}

impl JsonLinesBus<tokio::io::Stdout> {
    pub fn stdout(schema: RecordSchema) -> Self {
        Self::new(schema, tokio::io::stdout())
    }
}

impl<W> JsonLinesBus<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(schema: RecordSchema, writer: W) -> Self {
        Self {
            schema,
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W> MessageBusSink for JsonLinesBus<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn publish(&self, topic: &str, record: &Record) -> Result<(), SinkError> {
        let value = serde_json::to_value(record)?;
        self.schema.validate(&value)?;

        let envelope = serde_json::json!({ "topic": topic, "value": value });
        let mut line = serde_json::to_vec(&envelope)?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(&line).await?;
        Ok(())
    }

    async fn flush(&self) -> Result<(), SinkError> {
        self.writer.lock().await.flush().await?;
        Ok(())
    }
}
