//! Prompt assembly for grounded and direct chat

use crate::domain::models::ChatTurn;

/// System message used when the caller supplies no preamble
pub const DEFAULT_PREAMBLE: &str = "You are a helpful assistant. Use the following context from the uploaded document to answer the user's question. If the context doesn't contain enough information to answer the question, say so.";

/// Length limit instruction appended to every system prompt
pub const WORD_LIMIT_INSTRUCTION: &str = "Do not produce answers greater than 500 words";

/// Math formatting instruction appended to every system prompt
pub const MATH_FORMAT_INSTRUCTION: &str = "Use $...$ for inline math and $$...$$ for block math. Do not use square brackets [ ... ] for mathematical expressions. Remove any spaces between the closing $ and the content of the expression.";

/// Build the system message that grounds the model in `context`
///
/// An empty preamble falls back to [`DEFAULT_PREAMBLE`]. Whitespace-only
/// preambles are kept as given.
pub fn grounded_system_message(preamble: &str, context: &str) -> String {
    let body = if preamble.is_empty() {
        format!("{DEFAULT_PREAMBLE}\n\nContext:\n{context}")
    } else {
        format!("{preamble}\n\nUse the following context to answer the user's question:\n\n{context}")
    };

    format!("{body}\n\n{WORD_LIMIT_INSTRUCTION}\n\n{MATH_FORMAT_INSTRUCTION}")
}

/// Turns sent for a retrieval-grounded answer: one system turn, one user turn
pub fn build_rag_turns(query: &str, preamble: &str, context: &str) -> Vec<ChatTurn> {
    vec![
        ChatTurn::system(grounded_system_message(preamble, context)),
        ChatTurn::user(query),
    ]
}

/// Turns sent for a direct chat without retrieval
///
/// The formatting instructions travel as separate system turns after the
/// caller's own system message.
pub fn build_direct_chat_turns(system: &str, message: &str) -> Vec<ChatTurn> {
    vec![
        ChatTurn::system(system),
        ChatTurn::system(WORD_LIMIT_INSTRUCTION),
        ChatTurn::system(MATH_FORMAT_INSTRUCTION),
        ChatTurn::user(message),
    ]
}
