use crate::error::ConfigError;
use crate::observability::LogFormat;
use crate::resilience::RetryPolicy;
use crate::sinks::BusEndpoints;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Command line, as typed by the user. Validate with [`Cli::into_config`].
#[derive(Parser, Debug, Clone)]
#[command(name = "telemetry-gen", about = "Schema-validated telemetry generator")]
pub struct Cli {
    /// Schema registry host; the broker is expected on the same host
    #[arg(long = "schema_registry_host")]
    pub schema_registry_host: Option<String>,

    /// Record schema (.avsc) to produce under
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Topic to publish to
    #[arg(long)]
    pub topic: Option<String>,

    /// Carbon host; metric lines are skipped when absent
    #[arg(long = "carbon_host")]
    pub carbon_host: Option<String>,

    /// Messages per second
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub frequency: f64,

    /// Seed for reproducible signals
    #[arg(long)]
    pub seed: Option<u64>,

    /// Extra publish attempts before a tick fails
    #[arg(long = "publish_retries", default_value_t = 0)]
    pub publish_retries: usize,

    /// First retry delay, doubled on each further attempt
    #[arg(long = "retry_base_ms", default_value_t = 100)]
    pub retry_base_ms: u64,

    #[arg(long = "log_format", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Validated settings for one generator process.
///
/// The topic is checked when its channel set is built, see
/// [`crate::nodes::for_topic`].
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub schema_registry_host: String,
    pub schema_path: PathBuf,
    pub topic: String,
    pub carbon_host: Option<String>,
    pub frequency: f64,
    /// Sleep between ticks, `1 / frequency`
    pub period: Duration,
    pub seed: Option<u64>,
    pub retry: RetryPolicy,
}

impl Cli {
    pub fn into_config(self) -> Result<GeneratorConfig, ConfigError> {
        let schema_registry_host = self
            .schema_registry_host
            .filter(|h| !h.is_empty())
            .ok_or(ConfigError::MissingRegistryHost)?;
        let schema_path = self.schema.ok_or(ConfigError::MissingSchema)?;
        let topic = self.topic.ok_or(ConfigError::MissingTopic)?;

        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(ConfigError::InvalidFrequency(self.frequency));
        }
        let period = Duration::try_from_secs_f64(1.0 / self.frequency)
            .map_err(|_| ConfigError::InvalidFrequency(self.frequency))?;

        Ok(GeneratorConfig {
            schema_registry_host,
            schema_path,
            topic,
            carbon_host: self.carbon_host.filter(|h| !h.is_empty()),
            frequency: self.frequency,
            period,
            seed: self.seed,
            retry: RetryPolicy::exponential(self.publish_retries, self.retry_base_ms),
        })
    }
}

impl GeneratorConfig {
    pub fn bus_endpoints(&self) -> BusEndpoints {
        BusEndpoints::from_registry_host(&self.schema_registry_host)
    }
}
