//! Turn lifecycle state and the transient per-request stream buffer.

use serde::{Deserialize, Serialize};

use crate::reasoning;

/// Where the orchestrator is in the current request/response cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    /// No request in flight
    #[default]
    Idle,
    /// Request sent, no token received yet
    AwaitingFirstToken,
    /// At least one token received
    Streaming,
    /// Assistant turn appended
    Finalized,
    /// Request failed or was cancelled; nothing was appended
    Errored,
}

/// What changed after feeding one token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamUpdate {
    /// New reasoning text, only when it differs from what was last emitted
    pub reasoning: Option<String>,
    /// Current answer text
    pub answer: String,
}

/// Accumulated output of the in-flight request.
///
/// Lives only as long as one request; it is dropped on finalization or error
/// so a partial answer can never leak into the conversation.
#[derive(Debug, Default)]
pub struct StreamState {
    accumulated_text: String,
    last_emitted_reasoning: String,
}

impl StreamState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token and recompute the split of everything seen so far
    pub fn push(&mut self, token: &str) -> StreamUpdate {
        self.accumulated_text.push_str(token);
        let split = reasoning::split(&self.accumulated_text);

        let reasoning = if !split.reasoning.is_empty()
            && split.reasoning != self.last_emitted_reasoning
        {
            self.last_emitted_reasoning = split.reasoning.to_string();
            Some(self.last_emitted_reasoning.clone())
        } else {
            None
        };

        StreamUpdate {
            reasoning,
            answer: split.answer.to_string(),
        }
    }

    /// Final `(answer, reasoning)` from the complete text
    pub fn finish(self) -> (String, String) {
        let split = reasoning::split(&self.accumulated_text);
        (split.answer.to_string(), split.reasoning.to_string())
    }
}
