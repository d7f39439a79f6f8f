use anyhow::{Context, Result};
use futures::TryStreamExt;
use serde_json::json;
use std::sync::Arc;

use super::print_stream;
use crate::adapters::generation::OpenAiChatProvider;
use crate::domain::models::Config;
use crate::services::ChatService;

/// Handle the chat command
pub async fn handle_chat(config: &Config, message: &str, system: &str, json: bool) -> Result<()> {
    let generator =
        OpenAiChatProvider::new(&config.openai).context("Failed to create chat provider")?;
    let service = ChatService::new(Arc::new(generator));

    let stream = service
        .stream(system, message, config.rag.temperature)
        .await
        .context("Failed to start chat")?;

    if json {
        let fragments: Vec<String> = stream.try_collect().await.context("Generation failed")?;
        let output = json!({ "answer": fragments.concat() });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_stream(stream).await?;
    }

    Ok(())
}
