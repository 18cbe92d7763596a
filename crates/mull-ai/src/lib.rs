//! mull-ai: client layer for a local inference server
//!
//! This crate speaks the streaming `/api/generate` protocol of an
//! Ollama-compatible server: request types, newline-delimited JSON decoding
//! into text tokens, and the model list the user picks from.

pub mod client;
pub mod error;
pub mod models;
pub mod stream;
pub mod types;

pub use client::OllamaClient;
pub use error::{Error, Result};
pub use stream::TokenStream;
pub use types::*;
