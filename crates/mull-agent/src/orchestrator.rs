//! Turn orchestration: one request/response cycle per user message

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::{
    conversation::{ConversationStore, Turn},
    error::Result,
    events::TurnEvent,
    handle::TurnHandle,
    state::{StreamState, TurnState},
    transport::Transport,
};

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Model name sent with every request
    pub model: String,
    /// Optional deadline for a whole turn; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl OrchestratorConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            timeout: None,
        }
    }
}

/// Drives turns against the inference server and owns the conversation
pub struct Orchestrator {
    config: OrchestratorConfig,
    conversation: ConversationStore,
    transport: Arc<dyn Transport>,
    event_tx: broadcast::Sender<TurnEvent>,
    handle: TurnHandle,
    state: TurnState,
    turn_number: u32,
}

impl Orchestrator {
    /// Create an orchestrator with an empty conversation
    pub fn new(config: OrchestratorConfig, transport: Arc<dyn Transport>) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            config,
            conversation: ConversationStore::new(),
            transport,
            event_tx,
            handle: TurnHandle::new(),
            state: TurnState::Idle,
            turn_number: 0,
        }
    }

    /// Subscribe to turn events
    pub fn subscribe(&self) -> broadcast::Receiver<TurnEvent> {
        self.event_tx.subscribe()
    }

    /// The conversation so far
    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }

    /// All turns in chronological order
    pub fn history(&self) -> &[Turn] {
        self.conversation.history()
    }

    /// Lifecycle state of the most recent turn
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Model used for the next turn
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Switch models between turns
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.config.model = model.into();
    }

    /// Set or clear the per-turn deadline
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.config.timeout = timeout;
    }

    /// Get a cloneable handle for aborting the turn from outside
    pub fn handle(&self) -> TurnHandle {
        self.handle.clone()
    }

    /// Abort the current turn
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Whether a turn is currently running
    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    fn emit(&self, event: TurnEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Submit a user message and stream the assistant's reply.
    ///
    /// The user turn is appended before the request is sent, so it stays in
    /// the history even when the request fails. The assistant turn is
    /// appended exactly once, and only when the stream completes; on any
    /// error the partial output is dropped.
    pub async fn submit(&mut self, input: &str) -> Result<Turn> {
        let cancel = self.handle.begin();
        self.turn_number += 1;

        self.conversation.append(Turn::user(input));
        let prompt = self.conversation.prompt();
        self.state = TurnState::AwaitingFirstToken;

        tracing::debug!(
            conversation = %self.conversation.id(),
            turn = self.turn_number,
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Starting turn"
        );
        self.emit(TurnEvent::TurnStart {
            turn_number: self.turn_number,
            model: self.config.model.clone(),
        });
        self.emit(TurnEvent::AwaitingFirstToken);

        let result = match self.config.timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, self.stream_turn(prompt, cancel)).await {
                    Ok(result) => result,
                    Err(_) => Err(mull_ai::Error::Timeout(limit).into()),
                }
            }
            None => self.stream_turn(prompt, cancel).await,
        };

        let outcome = match result {
            Ok((answer, reasoning)) => {
                let turn = Turn::assistant(answer, reasoning);
                self.conversation.append(turn.clone());
                self.state = TurnState::Finalized;
                tracing::info!(
                    turn = self.turn_number,
                    answer_len = turn.content().len(),
                    reasoning_len = turn.reasoning().len(),
                    "Turn finalized"
                );
                self.emit(TurnEvent::TurnEnd { turn: turn.clone() });
                Ok(turn)
            }
            Err(e) => {
                self.state = TurnState::Errored;
                tracing::warn!(turn = self.turn_number, "Turn failed: {}", e);
                self.emit(TurnEvent::TurnError {
                    kind: e.kind(),
                    message: e.to_string(),
                });
                Err(e)
            }
        };

        self.handle.finish();
        outcome
    }

    /// Pull tokens until the stream ends, emitting updates along the way.
    /// Returns the final `(answer, reasoning)`.
    async fn stream_turn(
        &mut self,
        prompt: String,
        cancel: CancellationToken,
    ) -> Result<(String, String)> {
        let mut tokens = self
            .transport
            .generate(&self.config.model, prompt, cancel.clone())
            .await?;
        let mut stream_state = StreamState::new();

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(mull_ai::Error::Aborted.into()),
                next = tokens.next() => next,
            };
            let Some(token) = next else {
                break;
            };
            let token = token?;

            if self.state == TurnState::AwaitingFirstToken {
                self.state = TurnState::Streaming;
            }

            let update = stream_state.push(&token);
            if let Some(reasoning) = update.reasoning {
                self.emit(TurnEvent::ReasoningUpdate { reasoning });
            }
            self.emit(TurnEvent::AnswerUpdate {
                answer: update.answer,
            });
        }

        Ok(stream_state.finish())
    }
}
