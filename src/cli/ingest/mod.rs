//! Ingest command - ingests local PDF files

use std::path::PathBuf;

use tracing::info;

use crate::infrastructure::services::IngestionServiceTrait;

/// Ingest each file and print its outcome as one JSON line
pub async fn run(paths: Vec<PathBuf>) -> anyhow::Result<()> {
    let config = super::init()?;
    let services = crate::create_services(&config).await?;

    let outcomes = services.ingestion.ingest_paths(&paths).await;
    let ingested = outcomes.iter().filter(|o| o.is_ingested()).count();

    for outcome in &outcomes {
        println!("{}", serde_json::to_string(outcome)?);
    }

    info!(files = outcomes.len(), ingested, "Ingestion finished");

    if ingested < outcomes.len() {
        anyhow::bail!("{} of {} files were not ingested", outcomes.len() - ingested, outcomes.len());
    }

    Ok(())
}
