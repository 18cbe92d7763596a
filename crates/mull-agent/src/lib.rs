//! mull-agent: conversation runtime
//!
//! This crate drives one request/response cycle per user message: it keeps
//! the append-only conversation log, streams tokens from the transport,
//! separates the model's reasoning block from its answer, and reports
//! progress to observers as [`TurnEvent`]s.

pub mod conversation;
pub mod error;
pub mod events;
pub mod handle;
pub mod orchestrator;
pub mod reasoning;
pub mod state;
pub mod transport;

pub use conversation::{ConversationStore, Role, Turn};
pub use error::{Error, Result};
pub use events::{TurnErrorKind, TurnEvent};
pub use handle::TurnHandle;
pub use orchestrator::{Orchestrator, OrchestratorConfig};
pub use state::{StreamState, StreamUpdate, TurnState};
pub use transport::{OllamaTransport, Transport};
