//! Scripted generation provider for tests.

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::ChatTurn;
use crate::domain::ports::{FragmentStream, GenerationProvider};

/// A request received by [`MockGenerationProvider`]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Turns passed to `stream`
    pub turns: Vec<ChatTurn>,
    /// Sampling temperature passed to `stream`
    pub temperature: f32,
}

/// Mock generation provider.
///
/// Replays the same scripted fragments for every call and records what it
/// was asked. Streams it hands out are counted until they are dropped.
pub struct MockGenerationProvider {
    fragments: Vec<String>,
    fail_after: Option<(usize, String)>,
    open_error: Option<String>,
    stall: bool,
    calls: Mutex<Vec<RecordedCall>>,
    live: Arc<AtomicUsize>,
}

impl MockGenerationProvider {
    /// Create a provider that streams `fragments` in order
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
            fail_after: None,
            open_error: None,
            stall: false,
            calls: Mutex::new(Vec::new()),
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Yield a generation error after `count` fragments, then end the stream
    #[must_use]
    pub fn failing_after(mut self, count: usize, message: impl Into<String>) -> Self {
        self.fail_after = Some((count, message.into()));
        self
    }

    /// Refuse to open the stream at all
    #[must_use]
    pub fn failing_to_open(mut self, message: impl Into<String>) -> Self {
        self.open_error = Some(message.into());
        self
    }

    /// Keep the stream pending after the scripted fragments instead of ending it
    #[must_use]
    pub const fn stalling(mut self) -> Self {
        self.stall = true;
        self
    }

    /// Number of streams handed out and not yet dropped
    pub fn open_streams(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Turns of the most recent call
    pub fn last_turns(&self) -> Option<Vec<ChatTurn>> {
        self.calls().pop().map(|call| call.turns)
    }
}

#[async_trait]
impl GenerationProvider for MockGenerationProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn stream(&self, turns: &[ChatTurn], temperature: f32) -> RagResult<FragmentStream> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                turns: turns.to_vec(),
                temperature,
            });

        if let Some(message) = &self.open_error {
            return Err(RagError::Generation(message.clone()));
        }

        let items: Vec<RagResult<String>> = match &self.fail_after {
            Some((count, message)) => self
                .fragments
                .iter()
                .take(*count)
                .cloned()
                .map(Ok)
                .chain(std::iter::once(Err(RagError::Generation(message.clone()))))
                .collect(),
            None => self.fragments.iter().cloned().map(Ok).collect(),
        };

        let scripted = stream::iter(items);
        let inner: FragmentStream = if self.stall {
            Box::pin(scripted.chain(stream::pending()))
        } else {
            Box::pin(scripted)
        };

        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::pin(TrackedStream {
            inner,
            live: Arc::clone(&self.live),
        }))
    }
}

/// Fragment stream that decrements the provider's live count when dropped
struct TrackedStream {
    inner: FragmentStream,
    live: Arc<AtomicUsize>,
}

impl Stream for TrackedStream {
    type Item = RagResult<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}
