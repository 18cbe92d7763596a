//! Error types for mull-ai

use std::time::Duration;
use thiserror::Error;

/// Result type alias using mull-ai Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the inference server
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed (connection refused, reset, body read error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Server reported an error inside the response stream
    #[error("Server error: {0}")]
    Server(String),

    /// A response line could not be parsed as a generate chunk
    #[error("Malformed response line {line:?}: {source}")]
    Protocol {
        line: String,
        #[source]
        source: serde_json::Error,
    },

    /// A response line was not valid UTF-8
    #[error("Response line is not valid UTF-8")]
    InvalidUtf8,

    /// Request serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Stream was aborted
    #[error("Request aborted")]
    Aborted,

    /// The turn ran past its deadline
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl Error {
    /// Create a protocol error for an unparseable line
    pub fn protocol(line: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Protocol {
            line: line.into(),
            source,
        }
    }

    /// Whether the server could not be reached or failed while answering
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::Status { .. } | Error::Server(_)
        )
    }

    /// Whether the server broke the line-delimited JSON contract
    pub fn is_protocol(&self) -> bool {
        matches!(self, Error::Protocol { .. } | Error::InvalidUtf8)
    }
}
