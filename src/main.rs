use clap::Parser;
use book_rag::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Ingest { paths } => cli::ingest::run(paths).await,
        Command::Ask { query, session } => cli::ask::run(query, session).await,
    }
}
