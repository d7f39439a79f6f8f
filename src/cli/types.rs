use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docrag")]
#[command(about = "Ask questions about a single document with retrieval-augmented generation", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .docrag/config.yaml)
    #[arg(short, long, global = true, env = "DOCRAG_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Index a text file and stream an answer grounded in it
    Ask {
        /// Text file to index
        file: PathBuf,

        /// Question to answer
        question: String,

        /// Instructions placed before the retrieved context
        #[arg(short, long, default_value = "")]
        system: String,

        /// Sampling temperature (0-2), overrides the configured value
        #[arg(short, long)]
        temperature: Option<f32>,

        /// Show the retrieved chunks used as context
        #[arg(long)]
        sources: bool,
    },

    /// Chat with the model directly, without a document
    Chat {
        /// Message to send
        message: String,

        /// System message
        #[arg(short, long, default_value = "You are a helpful assistant.")]
        system: String,

        /// Sampling temperature (0-2), overrides the configured value
        #[arg(short, long)]
        temperature: Option<f32>,
    },
}
