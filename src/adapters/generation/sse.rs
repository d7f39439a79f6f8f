//! Server-Sent Events (SSE) parsing for streamed chat completions
//!
//! OpenAI-compatible servers answer a `stream: true` request with a sequence
//! of events separated by a blank line:
//!
//! ```text
//! data: {"choices":[{"index":0,"delta":{"content":"Hel"}}]}
//!
//! data: {"choices":[{"index":0,"delta":{"content":"lo"}}]}
//!
//! data: [DONE]
//! ```
//!
//! [`SseStreamParser`] turns the raw byte stream into the text fragments
//! carried in `choices[0].delta.content`.

use bytes::Bytes;
use futures::Stream;
use serde::Deserialize;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::{debug, warn};

use crate::domain::errors::{RagError, RagResult};

/// A single `chat.completion.chunk` payload
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChunk {
    /// Choices carried by this chunk
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

/// One choice within a streamed chunk
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkChoice {
    /// Incremental message update
    #[serde(default)]
    pub delta: ChunkDelta,

    /// Set on the last chunk of a choice
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Incremental message content
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    /// Text appended to the answer
    #[serde(default)]
    pub content: Option<String>,
}

/// Error payload some servers send in-band instead of an HTTP error status
#[derive(Debug, Clone, Deserialize)]
struct ErrorEvent {
    error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    message: String,
}

/// What a single SSE event means for the fragment stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A non-empty text fragment
    Fragment(String),
    /// Nothing to emit (keep-alive, role-only delta, comment)
    Skip,
    /// The server signalled the end of the stream
    Done,
}

/// Interpret one SSE event block (the lines between two blank lines)
pub fn parse_sse_event(block: &str) -> RagResult<SseEvent> {
    let data: Vec<&str> = block
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|value| value.strip_prefix(' ').unwrap_or(value))
        .collect();

    if data.is_empty() {
        return Ok(SseEvent::Skip);
    }

    let payload = data.join("\n");
    let payload = payload.trim();

    if payload.is_empty() {
        return Ok(SseEvent::Skip);
    }

    if payload == "[DONE]" {
        return Ok(SseEvent::Done);
    }

    if let Ok(event) = serde_json::from_str::<ErrorEvent>(payload) {
        return Err(RagError::Generation(event.error.message));
    }

    let chunk: CompletionChunk = serde_json::from_str(payload).map_err(|e| {
        warn!("Failed to parse SSE event: {} - Data: {}", e, payload);
        RagError::Generation(format!("malformed stream event: {e}"))
    })?;

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty())
        .map_or(SseEvent::Skip, SseEvent::Fragment))
}

/// Server-Sent Events parser yielding generated text fragments
///
/// The first error ends the stream: it is yielded once and every later poll
/// returns `None`.
pub struct SseStreamParser {
    inner: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
    buffer: Vec<u8>,
    finished: bool,
}

impl SseStreamParser {
    /// Create a new SSE parser from a byte stream
    pub fn new(stream: impl Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static) -> Self {
        Self {
            inner: Box::pin(stream),
            buffer: Vec::new(),
            finished: false,
        }
    }

    /// Remove the next complete event block from the buffer
    fn next_block(&mut self) -> Option<String> {
        let (end, delimiter) = find_event_end(&self.buffer)?;
        let block: Vec<u8> = self.buffer.drain(..end + delimiter).collect();
        Some(String::from_utf8_lossy(&block[..end]).into_owned())
    }

    fn handle_block(&mut self, block: &str) -> Option<RagResult<String>> {
        match parse_sse_event(block) {
            Ok(SseEvent::Fragment(text)) => Some(Ok(text)),
            Ok(SseEvent::Skip) => None,
            Ok(SseEvent::Done) => {
                debug!("Received end of stream marker");
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

/// Position and length of the first blank-line delimiter in `buffer`
fn find_event_end(buffer: &[u8]) -> Option<(usize, usize)> {
    let lf = buffer.windows(2).position(|w| w == b"\n\n").map(|i| (i, 2));
    let crlf = buffer
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|i| (i, 4));

    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

impl Stream for SseStreamParser {
    type Item = RagResult<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if self.finished {
                return Poll::Ready(None);
            }

            // Try to parse events from buffer
            if let Some(block) = self.next_block() {
                if let Some(item) = self.handle_block(&block) {
                    return Poll::Ready(Some(item));
                }
                continue;
            }

            // Need more data - poll inner stream
            match self.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    self.buffer.extend_from_slice(&bytes);
                }
                Poll::Ready(Some(Err(err))) => {
                    self.finished = true;
                    return Poll::Ready(Some(Err(RagError::Generation(format!(
                        "stream interrupted: {err}"
                    )))));
                }
                Poll::Ready(None) => {
                    // Stream ended - flush a trailing event without delimiter
                    let rest = std::mem::take(&mut self.buffer);
                    let rest = String::from_utf8_lossy(&rest).into_owned();
                    if rest.trim().is_empty() {
                        self.finished = true;
                        return Poll::Ready(None);
                    }
                    debug!("Stream ended with unterminated event: {}", rest);
                    let item = self.handle_block(&rest);
                    self.finished = true;
                    return Poll::Ready(item);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
