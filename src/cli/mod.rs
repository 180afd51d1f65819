//! CLI module for Book RAG
//!
//! - `serve`: HTTP server with the chat page
//! - `ingest`: ingest local PDF files
//! - `ask`: answer one question from the command line

pub mod ask;
pub mod ingest;
pub mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Book RAG - ask questions about the books you upload
#[derive(Parser, Debug)]
#[command(name = "book-rag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Ingest PDF files into the document store and print each result
    Ingest {
        /// PDF files to ingest
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Ask one question and print the answer
    Ask {
        query: String,

        /// Conversation session to continue
        #[arg(long)]
        session: Option<String>,
    },
}

/// Load configuration and start logging
pub(crate) fn init() -> anyhow::Result<AppConfig> {
    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);
    Ok(config)
}
