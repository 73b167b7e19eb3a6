use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use telemetry_gen::config::Cli;
use telemetry_gen::engine::PublishScheduler;
use telemetry_gen::nodes;
use telemetry_gen::observability::init_logging;
use telemetry_gen::sinks::{CarbonSink, JsonLinesBus, MessageBusSink, MetricsSink, RecordSchema};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let config = cli.into_config().context("invalid configuration")?;
    let channels = nodes::for_topic(&config.topic).context("invalid configuration")?;
    let schema = RecordSchema::load(&config.schema_path)
        .with_context(|| format!("cannot use schema {}", config.schema_path.display()))?;

    let endpoints = config.bus_endpoints();
    info!(
        topic = %config.topic,
        frequency = config.frequency,
        schema = schema.name(),
        bootstrap = %endpoints.bootstrap_servers,
        registry = %endpoints.schema_registry_url,
        "message bus configured"
    );
    let bus: Arc<dyn MessageBusSink> = Arc::new(JsonLinesBus::stdout(schema));

    let metrics_sink = config.carbon_host.as_deref().map(|host| {
        let sink = CarbonSink::for_host(host);
        info!(address = sink.address(), "carbon metrics enabled");
        Arc::new(sink) as Arc<dyn MetricsSink>
    });

    let mut scheduler = PublishScheduler::from_config(&config, channels, bus, metrics_sink);
    scheduler.run().await
}
