pub mod attitude;
pub mod spiky_sine;

pub use attitude::{AttitudeChannelSet, ATTITUDE_TOPIC};
pub use spiky_sine::{SignalGenerator, SignalParameters};

use crate::core::ChannelSet;
use crate::error::ConfigError;

/// Build the channel set that serves `topic`.
pub fn for_topic(topic: &str) -> Result<Box<dyn ChannelSet>, ConfigError> {
    match topic {
        ATTITUDE_TOPIC => Ok(Box::new(AttitudeChannelSet::new()?)),
        other => Err(ConfigError::UnsupportedTopic(other.to_string())),
    }
}
