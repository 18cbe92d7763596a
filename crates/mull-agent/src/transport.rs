//! Transport abstraction between the orchestrator and the inference server

use async_trait::async_trait;
use mull_ai::{GenerateRequest, OllamaClient, Result, TokenStream};
use tokio_util::sync::CancellationToken;

/// Opens a token stream for one prompt
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `prompt` to `model` and stream back its tokens
    async fn generate(
        &self,
        model: &str,
        prompt: String,
        cancel: CancellationToken,
    ) -> Result<TokenStream>;
}

/// Transport backed by the `/api/generate` HTTP endpoint
pub struct OllamaTransport {
    client: OllamaClient,
}

impl OllamaTransport {
    /// Create a transport for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: OllamaClient::new(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

#[async_trait]
impl Transport for OllamaTransport {
    async fn generate(
        &self,
        model: &str,
        prompt: String,
        cancel: CancellationToken,
    ) -> Result<TokenStream> {
        let request = GenerateRequest::new(model, prompt);
        tokio::select! {
            _ = cancel.cancelled() => Err(mull_ai::Error::Aborted),
            result = self.client.generate(&request) => result,
        }
    }
}
