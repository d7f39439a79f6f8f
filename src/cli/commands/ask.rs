use anyhow::{Context, Result};
use futures::TryStreamExt;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

use super::print_stream;
use crate::adapters::embeddings::OpenAiEmbeddingProvider;
use crate::adapters::generation::OpenAiChatProvider;
use crate::adapters::loaders::TextFileLoader;
use crate::cli::output::{create_spinner, format_sources, heading};
use crate::domain::models::Config;
use crate::domain::ports::DocumentLoader;
use crate::services::RagOrchestrator;

/// Handle the ask command: index `file`, then answer `question` from it
pub async fn handle_ask(
    config: &Config,
    file: &Path,
    question: &str,
    system: &str,
    show_sources: bool,
    json: bool,
) -> Result<()> {
    let embedder = OpenAiEmbeddingProvider::new(&config.openai)
        .context("Failed to create embedding provider")?;
    let generator =
        OpenAiChatProvider::new(&config.openai).context("Failed to create chat provider")?;

    let rag = RagOrchestrator::new(config.rag, Arc::new(embedder), Arc::new(generator))?;

    let document = TextFileLoader::new()
        .load(file)
        .await
        .with_context(|| format!("Failed to load {}", file.display()))?;

    let spinner = if json {
        indicatif::ProgressBar::hidden()
    } else {
        create_spinner(format!("Indexing {}", file.display()))
    };
    let indexed = rag.index(document).await;
    spinner.finish_and_clear();
    let summary = indexed.context("Failed to index document")?;

    let (sources, stream) = rag
        .answer_with_sources(question, system)
        .await
        .context("Failed to start answer")?;

    if json {
        let answer: String = stream
            .try_collect()
            .await
            .context("Generation failed mid-stream")?;
        let output = json!({
            "index": summary,
            "message": summary.message(),
            "sources": show_sources.then_some(sources.hits),
            "answer": answer,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        eprintln!("{}", heading(&summary.message()));
        if show_sources {
            eprintln!("{}", format_sources(&sources));
        }
        print_stream(stream).await?;
    }

    Ok(())
}
