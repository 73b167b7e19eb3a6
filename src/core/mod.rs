pub mod channel_set;
pub mod record;

pub use channel_set::ChannelSet;
pub use record::{ChannelValue, Record, RecordHeader};
