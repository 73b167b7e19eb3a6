use thiserror::Error;

/// Rejected signal parameters. Raised at construction, never per sample.
#[derive(Debug, Error, PartialEq)]
pub enum SignalError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Startup configuration problems. All of them abort before the first tick.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required option --schema_registry_host")]
    MissingRegistryHost,

    #[error("missing required option --schema")]
    MissingSchema,

    #[error("missing required option --topic")]
    MissingTopic,

    #[error("unsupported topic '{0}': only 'hmod_Attitude' is available, add a ChannelSet to cover other topics")]
    UnsupportedTopic(String),

    #[error("frequency must be a positive number of messages per second, got {0}")]
    InvalidFrequency(f64),

    #[error(transparent)]
    Signal(#[from] SignalError),
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("cannot read schema file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("schema is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("schema is not a record definition: {0}")]
    NotARecord(String),

    #[error("record is missing field '{0}'")]
    MissingField(String),

    #[error("field '{field}' expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },
}

/// Failures reported by a sink. The scheduler decides whether they are fatal.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("record rejected by schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
