//! Error types for mull-agent

use thiserror::Error;

use crate::events::TurnErrorKind;

/// Result type alias using mull-agent Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can end a turn
#[derive(Error, Debug)]
pub enum Error {
    /// An error from the client layer
    #[error(transparent)]
    Ai(#[from] mull_ai::Error),
}

impl Error {
    /// Check if the inference server was unreachable or failed
    pub fn is_connectivity(&self) -> bool {
        let Error::Ai(e) = self;
        e.is_connectivity()
    }

    /// Check if the server broke the response format
    pub fn is_protocol(&self) -> bool {
        let Error::Ai(e) = self;
        e.is_protocol()
    }

    /// Category reported to observers
    pub fn kind(&self) -> TurnErrorKind {
        let Error::Ai(e) = self;
        match e {
            mull_ai::Error::Aborted => TurnErrorKind::Cancelled,
            mull_ai::Error::Timeout(_) => TurnErrorKind::Timeout,
            mull_ai::Error::Protocol { .. } | mull_ai::Error::InvalidUtf8 => {
                TurnErrorKind::Protocol
            }
            mull_ai::Error::Http(_)
            | mull_ai::Error::Status { .. }
            | mull_ai::Error::Server(_)
            | mull_ai::Error::Json(_) => TurnErrorKind::Connectivity,
        }
    }
}
