//! Turn event types

use serde::{Deserialize, Serialize};

use crate::conversation::Turn;

/// Category of a failed turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnErrorKind {
    /// Server unreachable or failed while answering
    Connectivity,
    /// Server sent a line that could not be parsed
    Protocol,
    /// Turn aborted through the handle
    Cancelled,
    /// Turn ran past its configured deadline
    Timeout,
}

/// Events emitted while a turn is processed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    /// User turn appended; request about to be sent
    TurnStart { turn_number: u32, model: String },

    /// Request sent; show an in-progress indicator until the first token
    AwaitingFirstToken,

    /// Reasoning block changed
    ReasoningUpdate { reasoning: String },

    /// Answer so far (still streaming)
    AnswerUpdate { answer: String },

    /// Assistant turn finalized and appended
    TurnEnd { turn: Turn },

    /// Turn failed; no assistant turn was appended
    TurnError {
        kind: TurnErrorKind,
        message: String,
    },
}

impl TurnEvent {
    /// Check if this is a terminal event
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnEvent::TurnEnd { .. } | TurnEvent::TurnError { .. })
    }
}
