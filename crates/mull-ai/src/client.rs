//! HTTP client for an Ollama-compatible `/api/generate` endpoint

use crate::{
    error::{Error, Result},
    stream::{TokenStream, decode_body},
    types::{DEFAULT_BASE_URL, GenerateRequest},
};

/// Client for a local inference server
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    /// Create a client for the given base URL (e.g. "http://localhost:11434")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    /// Start a streaming generation.
    ///
    /// Fails with a connectivity error if the request cannot be sent or the
    /// server answers with a non-success status. The returned stream yields
    /// tokens lazily as the body arrives.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<TokenStream> {
        let url = self.generate_url();
        tracing::debug!(model = %request.model, %url, "Sending generate request");

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        Ok(decode_body(response.bytes_stream()))
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Pull the `error` field out of a JSON error body, falling back to the raw text
fn error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response and hand back the request body.
    async fn serve_once(status_line: &'static str, body: String) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let task = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request_body = read_request_body(&mut socket).await;

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/x-ndjson\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request_body
        });

        (format!("http://{}", addr), task)
    }

    async fn read_request_body(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        if name.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                let body_start = header_end + 4;
                if buf.len() >= body_start + content_length {
                    return String::from_utf8_lossy(&buf[body_start..body_start + content_length])
                        .to_string();
                }
            }
        }
        String::new()
    }

    #[tokio::test]
    async fn test_generate_streams_tokens() {
        let body = concat!(
            "{\"response\":\"Hi\",\"done\":false}\n",
            "{\"response\":\" there\",\"done\":true}\n"
        )
        .to_string();
        let (base_url, server) = serve_once("200 OK", body).await;

        let client = OllamaClient::new(base_url);
        let request = GenerateRequest::new("deepseek-r1:1.5b", "user: Hello\n");
        let tokens: Vec<String> = client
            .generate(&request)
            .await
            .unwrap()
            .map(|t| t.unwrap())
            .collect()
            .await;
        assert_eq!(tokens, vec!["Hi", " there"]);

        let sent: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(
            sent,
            serde_json::json!({
                "model": "deepseek-r1:1.5b",
                "prompt": "user: Hello\n",
                "stream": true
            })
        );
    }

    #[tokio::test]
    async fn test_generate_non_success_status() {
        let body = r#"{"error":"model 'nope' not found"}"#.to_string();
        let (base_url, _server) = serve_once("404 Not Found", body).await;

        let client = OllamaClient::new(base_url);
        let err = match client.generate(&GenerateRequest::new("nope", "x")).await {
            Ok(_) => panic!("expected status error"),
            Err(e) => e,
        };
        assert!(err.is_connectivity());
        match err {
            Error::Status { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "model 'nope' not found");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = OllamaClient::new(format!("http://{}", addr));
        let err = match client.generate(&GenerateRequest::new("m", "p")).await {
            Ok(_) => panic!("expected connection failure"),
            Err(e) => e,
        };
        assert!(err.is_connectivity(), "got: {:?}", err);
    }

    #[tokio::test]
    async fn test_generate_malformed_line() {
        let body = "{\"response\":\"a\",\"done\":false}\nnot json at all\n".to_string();
        let (base_url, _server) = serve_once("200 OK", body).await;

        let client = OllamaClient::new(base_url);
        let mut tokens = client.generate(&GenerateRequest::new("m", "p")).await.unwrap();
        assert_eq!(tokens.next().await.unwrap().unwrap(), "a");
        let err = tokens.next().await.unwrap().unwrap_err();
        assert!(err.is_protocol());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = OllamaClient::new("http://localhost:11434/");
        assert_eq!(client.generate_url(), "http://localhost:11434/api/generate");
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(OllamaClient::default().base_url(), "http://localhost:11434");
    }

    #[test]
    fn test_error_message_plain_text() {
        assert_eq!(error_message("  bad gateway \n"), "bad gateway");
    }
}
