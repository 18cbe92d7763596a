//! Line framing and token decoding for streamed generate responses
//!
//! The server answers `/api/generate` with newline-delimited JSON. [`lines`]
//! turns raw body chunks into text lines, [`decode`] turns lines into the
//! text tokens carried by each chunk's `response` field.

use std::pin::{Pin, pin};

use async_stream::stream;
use futures::StreamExt;
use tokio_stream::Stream;

use crate::error::{Error, Result};
use crate::types::GenerateChunk;

/// A lazy, single-use stream of response tokens
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Split a byte stream into lines.
///
/// Bytes are buffered until a `\n` arrives, so chunk boundaries may fall
/// anywhere (including inside a multi-byte character). A trailing `\r` is
/// stripped. An unterminated final line is still yielded when the body ends.
pub fn lines<S, B, E>(body: S) -> impl Stream<Item = Result<String>> + Send
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: Into<Error> + Send,
{
    stream! {
        let mut body = pin!(body);
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    yield Err(e.into());
                    return;
                }
            };
            buffer.extend_from_slice(chunk.as_ref());

            while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                let mut raw: Vec<u8> = buffer.drain(..=pos).collect();
                raw.pop();
                match line_from_bytes(raw) {
                    Ok(line) => yield Ok(line),
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        }

        if !buffer.is_empty() {
            yield line_from_bytes(buffer);
        }
    }
}

fn line_from_bytes(mut raw: Vec<u8>) -> Result<String> {
    if raw.last() == Some(&b'\r') {
        raw.pop();
    }
    String::from_utf8(raw).map_err(|_| Error::InvalidUtf8)
}

/// Decode a stream of response lines into text tokens.
///
/// Empty lines are skipped. A line that is not a JSON object fails the whole
/// stream with [`Error::Protocol`]. A `response` field is yielded before
/// `done` is examined; `done: true` ends the stream without reading further.
/// If the lines run out without `done`, the stream simply ends.
pub fn decode<S>(lines: S) -> TokenStream
where
    S: Stream<Item = Result<String>> + Send + 'static,
{
    Box::pin(stream! {
        let mut lines = pin!(lines);

        while let Some(line) = lines.next().await {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let chunk: GenerateChunk = match serde_json::from_str(line) {
                Ok(chunk) => chunk,
                Err(e) => {
                    tracing::debug!("Unparseable response line: {}", line);
                    yield Err(Error::protocol(line, e));
                    return;
                }
            };

            if let Some(token) = chunk.response {
                yield Ok(token);
            }

            if let Some(message) = chunk.error {
                yield Err(Error::Server(message));
                return;
            }

            if chunk.done {
                tracing::debug!(
                    prompt_tokens = chunk.prompt_eval_count,
                    output_tokens = chunk.eval_count,
                    total_duration_ns = chunk.total_duration,
                    "Generation done"
                );
                return;
            }
        }

        tracing::debug!("Response body ended without a done marker");
    })
}

/// Frame a raw response body and decode it into tokens
pub fn decode_body<S, B, E>(body: S) -> TokenStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<Error> + Send + 'static,
{
    decode(lines(body))
}
