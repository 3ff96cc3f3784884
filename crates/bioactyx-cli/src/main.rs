//! bioactyx — ChEMBL substructure search with bioactivity enrichment.
//! Entry point for the command-line binary.

mod config;

use std::sync::Arc;

use bioactyx_chembl::{run_activity_search, CsvFileSink};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bioactyx=debug,info")),
        )
        .init();

    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = config::Config::load()?;
    let job = config.to_job();
    info!(
        "Configuration loaded. Pattern: {}, cap: {}, concurrency: {}",
        job.pattern, job.max_results, job.concurrency
    );

    let client = Arc::new(config.build_client()?);
    info!("ChEMBL endpoint: {}", client.base_url());

    let mut sink = CsvFileSink::for_pattern(&config.output.dir, &job.pattern);
    let summary = run_activity_search(&job, client, &mut sink).await?;

    info!(
        "Run {} finished: {} dispatched, {} rows, {} dropped, {} duplicates, {} ms",
        summary.job_id,
        summary.dispatched,
        summary.rows_collected,
        summary.lookups_dropped,
        summary.duplicates_skipped,
        summary.duration_ms
    );
    match &summary.output {
        Some(path) => println!("Results saved to {}", path),
        None => println!("No results found."),
    }

    Ok(())
}
