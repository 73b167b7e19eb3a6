use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provenance block carried by every record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordHeader {
    pub source_system: String,
    pub source_module: String,
    /// Epoch seconds shared by every channel in the record
    pub time: i64,
}

/// One instantaneous sample of a named channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelValue {
    pub name: String,
    pub value: f64,
}

impl ChannelValue {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Unit handed to the message bus once per tick.
///
/// Channels serialize beside `header`, so an attitude record reads
/// `{"header": {...}, "phi": .., "psi": .., "theta": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub header: RecordHeader,

    #[serde(flatten)]
    pub channels: BTreeMap<String, f64>,
}

impl Record {
    pub fn new(source_system: &str, source_module: &str, time: i64) -> Self {
        Self {
            header: RecordHeader {
                source_system: source_system.to_string(),
                source_module: source_module.to_string(),
                time,
            },
            channels: BTreeMap::new(),
        }
    }

    pub fn with_values(mut self, values: &[ChannelValue]) -> Self {
        for v in values {
            self.channels.insert(v.name.clone(), v.value);
        }
        self
    }

    pub fn get(&self, channel: &str) -> Option<f64> {
        self.channels.get(channel).copied()
    }
}
