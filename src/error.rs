//! Error types for the logging pipeline.
//!
//! None of these ever reach an HTTP response: the middleware and the intake
//! endpoint recover from all of them and report through the log stream.

use thiserror::Error;

/// A severity name outside the syslog vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized log level '{value}'")]
pub struct LevelParseError {
    pub value: String,
}

/// A sink could not accept a line.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("sink rejected the line: {0}")]
    Rejected(String),
}

/// Emission reached at least one sink that failed.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("sink '{sink}' failed: {source}")]
    Sink {
        sink: String,
        #[source]
        source: SinkError,
    },
}
