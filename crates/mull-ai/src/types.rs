//! Wire types for the `/api/generate` endpoint

use serde::{Deserialize, Serialize};

/// Default address of a locally running Ollama server
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Request body for `POST /api/generate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model name (e.g. "deepseek-r1:1.5b")
    pub model: String,
    /// Full prompt text
    pub prompt: String,
    /// Always true; the client only consumes streamed responses
    pub stream: bool,
}

impl GenerateRequest {
    /// Create a streaming request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: true,
        }
    }
}

/// One line of the streamed response body
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GenerateChunk {
    /// Text fragment for this line
    #[serde(default)]
    pub response: Option<String>,
    /// Set on the final line
    #[serde(default)]
    pub done: bool,
    /// Error reported by the server mid-stream
    #[serde(default)]
    pub error: Option<String>,
    /// Number of prompt tokens evaluated (final line only)
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    /// Number of tokens generated (final line only)
    #[serde(default)]
    pub eval_count: Option<u64>,
    /// Wall time for the whole request in nanoseconds (final line only)
    #[serde(default)]
    pub total_duration: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_stream_flag() {
        let req = GenerateRequest::new("deepseek-r1:1.5b", "user: Hello\n");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "deepseek-r1:1.5b",
                "prompt": "user: Hello\n",
                "stream": true
            })
        );
    }

    #[test]
    fn test_chunk_with_only_done() {
        let chunk: GenerateChunk = serde_json::from_str(r#"{"done":true}"#).unwrap();
        assert!(chunk.done);
        assert!(chunk.response.is_none());
    }

    #[test]
    fn test_chunk_ignores_unknown_fields() {
        let line = r#"{"model":"m","created_at":"2025-03-12T10:00:00Z","response":"Hi","done":false,"context":[1,2]}"#;
        let chunk: GenerateChunk = serde_json::from_str(line).unwrap();
        assert_eq!(chunk.response.as_deref(), Some("Hi"));
        assert!(!chunk.done);
    }

    #[test]
    fn test_chunk_final_stats() {
        let line = r#"{"response":"","done":true,"eval_count":12,"prompt_eval_count":7,"total_duration":5000}"#;
        let chunk: GenerateChunk = serde_json::from_str(line).unwrap();
        assert_eq!(chunk.eval_count, Some(12));
        assert_eq!(chunk.prompt_eval_count, Some(7));
        assert_eq!(chunk.total_duration, Some(5000));
    }

    #[test]
    fn test_chunk_rejects_non_object() {
        assert!(serde_json::from_str::<GenerateChunk>("42").is_err());
        assert!(serde_json::from_str::<GenerateChunk>(r#""text""#).is_err());
    }
}
