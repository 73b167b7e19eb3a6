use super::{ChannelValue, Record};
use rand::RngCore;

/// A named bundle of signal generators that share one timestamp per tick.
///
/// Each supported topic gets its own implementation; the scheduler only ever
/// sees this trait.
pub trait ChannelSet: Send + Sync {
    /// Topic whose schema the produced records conform to
    fn topic(&self) -> &str;

    /// Prefix used for metric lines, e.g. `gen` in `gen.phi 1.5 1000`
    fn metric_prefix(&self) -> &str;

    /// Channel names in the order `produce_record` emits them
    fn channel_names(&self) -> Vec<&str>;

    /// Sample every channel at `timestamp` and bundle the values.
    ///
    /// The returned values follow `channel_names()` order and the record's
    /// `header.time` equals `timestamp`.
    fn produce_record(&self, timestamp: i64, rng: &mut dyn RngCore) -> (Record, Vec<ChannelValue>);
}
