//! Command handlers

pub mod ask;
pub mod chat;

use anyhow::{Context, Result};
use futures::StreamExt;
use std::io::Write;

use crate::domain::ports::FragmentStream;

/// Write fragments to stdout as they arrive, returning the full text
pub(crate) async fn print_stream(mut stream: FragmentStream) -> Result<String> {
    let mut stdout = std::io::stdout();
    let mut answer = String::new();

    while let Some(fragment) = stream.next().await {
        let fragment = fragment.context("Generation failed mid-stream")?;
        stdout.write_all(fragment.as_bytes())?;
        stdout.flush()?;
        answer.push_str(&fragment);
    }

    writeln!(stdout)?;
    Ok(answer)
}
