use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Document chunking and retrieval-augmented answering
#[derive(Debug, Parser)]
#[command(name = "sift", version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML settings file; environment variables override it
    #[arg(short, long, global = true, default_value = "sift.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Split a .txt or .pdf file into chunks and print them
    Chunk {
        /// File to split; a sample document is written and used when omitted
        #[arg(long)]
        file: Option<PathBuf>,

        /// Maximum chunk length in characters
        #[arg(long, default_value_t = 300)]
        chunk_size: usize,

        /// Characters shared by consecutive chunks
        #[arg(long, default_value_t = 50)]
        chunk_overlap: usize,
    },

    /// Chunk, embed, and index a file into the local snapshot
    Ingest {
        /// .txt or .pdf file to index
        path: PathBuf,
    },

    /// Answer a question from the indexed documents
    Ask {
        question: String,

        /// Search the web when the index has nothing relevant
        #[arg(long)]
        web: bool,
    },

    /// Index a small built-in knowledge base, ask it questions, then search the web
    Demo,

    /// Print formatted web search results
    Search { query: String },
}
