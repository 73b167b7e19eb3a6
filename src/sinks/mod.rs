pub mod bus;
pub mod carbon;
pub mod schema;

pub use bus::{BusEndpoints, JsonLinesBus, MessageBusSink};
pub use carbon::{format_metric_line, CarbonSink, MetricsSink};
pub use schema::RecordSchema;
