//! Direct chat without retrieval

use std::sync::Arc;

use crate::domain::errors::RagResult;
use crate::domain::ports::{FragmentStream, GenerationProvider};
use crate::services::prompt::build_direct_chat_turns;

/// Streams chat completions that are not grounded in the index
pub struct ChatService {
    generator: Arc<dyn GenerationProvider>,
}

impl ChatService {
    /// Create a new chat service
    pub fn new(generator: Arc<dyn GenerationProvider>) -> Self {
        Self { generator }
    }

    /// Stream a reply to `message` under the caller's `system` message
    pub async fn stream(
        &self,
        system: &str,
        message: &str,
        temperature: f32,
    ) -> RagResult<FragmentStream> {
        let turns = build_direct_chat_turns(system, message);
        tracing::debug!(
            provider = self.generator.name(),
            turns = turns.len(),
            "Starting direct chat"
        );

        self.generator.stream(&turns, temperature).await
    }
}
