//! Generation provider adapters

pub mod mock;
pub mod openai;
pub mod sse;

pub use mock::MockGenerationProvider;
pub use openai::OpenAiChatProvider;
pub use sse::SseStreamParser;
