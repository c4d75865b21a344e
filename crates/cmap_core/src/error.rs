use thiserror::Error;

use crate::source::SourceError;

/// Failures that abort the processing of a single matter.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The upstream vocabulary has an action the taxonomy does not know.
    /// The taxonomy has to be updated by hand; nothing is guessed.
    #[error("action {action:?} is not in the action taxonomy")]
    UnmappedAction { action: String },

    #[error("invalid date {value:?} in {field}")]
    InvalidDate { value: String, field: &'static str },

    #[error("matter is missing {0}")]
    MissingField(&'static str),

    #[error("upstream fetch failed: {0}")]
    Source(#[from] SourceError),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("matter {matter_id}: {source}")]
    Matter {
        matter_id: i64,
        #[source]
        source: IngestError,
    },

    #[error("listing matters failed: {0}")]
    Listing(#[from] SourceError),

    #[error("emit failed: {0}")]
    Sink(#[from] SinkError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid taxonomy YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("action {action:?} has order {order}; buckets run 0 to 4")]
    OrderOutOfRange { action: String, order: u8 },
}
