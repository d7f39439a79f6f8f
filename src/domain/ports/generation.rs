//! Generation provider port for streamed chat completions.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::domain::errors::RagResult;
use crate::domain::models::ChatTurn;

/// Lazily produced sequence of generated text fragments.
///
/// Each item is either a fragment or the failure that ended the stream.
/// Dropping the stream before it is exhausted cancels the upstream request.
pub type FragmentStream = Pin<Box<dyn Stream<Item = RagResult<String>> + Send>>;

/// Trait for chat generation providers.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Provider name (e.g., "openai", "mock").
    fn name(&self) -> &'static str;

    /// Start a streamed completion for the given turns.
    ///
    /// Errors returned here mean the stream could not be opened; errors that
    /// happen later arrive as an `Err` item on the stream.
    async fn stream(&self, turns: &[ChatTurn], temperature: f32) -> RagResult<FragmentStream>;
}
