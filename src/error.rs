//! Error types

use thiserror::Error;

/// Why an input line could not be turned into an event
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("line is not a valid JSON record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field `{0}` is missing or empty")]
    MissingField(&'static str),

    #[error("created_time `{value}` does not match YYYY-MM-DDTHH:MM:SSZ")]
    Timestamp {
        value: String,
        #[source]
        source: Option<chrono::ParseError>,
    },

    #[error("line is not valid UTF-8")]
    Encoding(#[from] std::str::Utf8Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("window must be a positive number of seconds")]
    ZeroWindow,

    #[error("generator needs at least two vertices, got {0}")]
    TooFewVertices(usize),
}
