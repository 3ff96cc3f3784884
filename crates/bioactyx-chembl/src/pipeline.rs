//! Search-and-enrich pipeline.
//!
//! Orchestrates one run:
//!   1. Page through the ChEMBL substructure search
//!   2. Deduplicate hits by ChEMBL ID
//!   3. Dispatch one bioactivity lookup per unique hit, up to the cap
//!   4. Collect profiles as lookups complete
//!   5. Hand a non-empty table to the sink
//!
//! The pipeline is best-effort: a failed search page ends paging, a failed
//! lookup drops one compound, and neither aborts the run.

use std::sync::Arc;
use std::time::Instant;

use bioactyx_common::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::bioactivity::{fetch_bioactivity, DEFAULT_ACTIVITY_LIMIT};
use crate::dedup::SeenIds;
use crate::export::TableSink;
use crate::models::{BioactivityProfile, Compound, EnrichedResult, ResultTable, RunSummary};
use crate::sources::ChemblApi;

// ── Job config ────────────────────────────────────────────────────────────────

/// Parameters for a single search run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySearchJob {
    /// SMILES fragment passed to `smiles_contains`.
    pub pattern: String,
    /// Cap on dispatched lookups (unique compounds).
    pub max_results: usize,
    pub page_size: usize,
    /// Activity records requested per compound.
    pub activity_limit: usize,
    /// Maximum lookups in flight at once.
    pub concurrency: usize,
}

impl ActivitySearchJob {
    pub fn new(pattern: impl Into<String>, max_results: usize) -> Self {
        Self { pattern: pattern.into(), max_results, ..Default::default() }
    }
}

impl Default for ActivitySearchJob {
    fn default() -> Self {
        Self {
            pattern: "catechol".to_string(),
            max_results: 100,
            page_size: 20,
            activity_limit: DEFAULT_ACTIVITY_LIMIT,
            concurrency: 10,
        }
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

type LookupOutcome = (Compound, Option<BioactivityProfile>);

/// Runs search, dispatch and collection, returning the table and run counters.
///
/// Rows appear in lookup completion order.
#[instrument(skip(api), fields(pattern = %job.pattern, max_results = job.max_results))]
pub async fn collect_results(
    job: &ActivitySearchJob,
    api: Arc<dyn ChemblApi>,
) -> (ResultTable, RunSummary) {
    let t0 = Instant::now();
    let mut summary = RunSummary::new(Uuid::new_v4(), &job.pattern);
    info!(job_id = %summary.job_id, "Starting activity search");

    let page_size = job.page_size.max(1);
    let limiter = Arc::new(Semaphore::new(job.concurrency.max(1)));
    let mut lookups: JoinSet<LookupOutcome> = JoinSet::new();
    let mut seen = SeenIds::new();
    let mut offset = 0;

    // ── 1. Page and dispatch ──────────────────────────────────────────────────
    'paging: while summary.dispatched < job.max_results {
        let page = match api.search_molecules(&job.pattern, page_size, offset).await {
            Ok(page) => page,
            Err(e) => {
                warn!(offset, status = ?e.status_code(), "Failed to retrieve data from ChEMBL API: {}", e);
                summary.search_error = Some(e.to_string());
                break;
            }
        };
        summary.pages_fetched += 1;

        if page.is_exhausted() {
            info!(offset, "No more results found.");
            break;
        }

        for compound in page.compounds {
            summary.compounds_seen += 1;
            if !seen.first_sighting(&compound.chembl_id) {
                summary.duplicates_skipped += 1;
                continue;
            }

            let api = Arc::clone(&api);
            let limiter = Arc::clone(&limiter);
            let limit = job.activity_limit;
            lookups.spawn(async move {
                let Ok(_permit) = limiter.acquire_owned().await else {
                    return (compound, None);
                };
                let profile = fetch_bioactivity(api.as_ref(), &compound.chembl_id, limit).await;
                (compound, profile)
            });

            summary.dispatched += 1;
            if summary.dispatched >= job.max_results {
                break 'paging;
            }
        }

        offset += page_size;
    }

    debug!(dispatched = summary.dispatched, pages = summary.pages_fetched, "Paging finished");

    // ── 2. Collect in completion order ────────────────────────────────────────
    let mut table = ResultTable::new();
    while let Some(joined) = lookups.join_next().await {
        match joined {
            Ok((compound, Some(profile))) => table.push(EnrichedResult::new(compound, profile)),
            Ok((compound, None)) => {
                debug!(chembl_id = %compound.chembl_id, "No bioactivity data; compound dropped");
                summary.lookups_dropped += 1;
            }
            Err(e) => {
                warn!("Bioactivity lookup task failed: {}", e);
                summary.lookups_dropped += 1;
            }
        }
    }

    summary.rows_collected = table.len();
    summary.duration_ms = t0.elapsed().as_millis() as u64;
    info!(
        rows = summary.rows_collected,
        dropped = summary.lookups_dropped,
        duplicates = summary.duplicates_skipped,
        duration_ms = summary.duration_ms,
        "Activity search complete"
    );

    (table, summary)
}

/// Runs the pipeline and writes the table to `sink` when it has rows.
///
/// Only a sink failure is returned as an error; search and lookup failures
/// are reflected in the summary.
pub async fn run_activity_search(
    job: &ActivitySearchJob,
    api: Arc<dyn ChemblApi>,
    sink: &mut dyn TableSink,
) -> Result<RunSummary> {
    let (table, mut summary) = collect_results(job, api).await;

    if table.is_empty() {
        info!("No results found.");
        return Ok(summary);
    }

    let destination = sink.write_table(&table)?;
    info!("Results saved to {}", destination);
    summary.output = Some(destination);

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_job_matches_reference_run() {
        let job = ActivitySearchJob::default();
        assert_eq!(job.pattern, "catechol");
        assert_eq!(job.max_results, 100);
        assert_eq!(job.page_size, 20);
        assert_eq!(job.activity_limit, 10);
        assert_eq!(job.concurrency, 10);
    }

    #[test]
    fn test_new_keeps_other_defaults() {
        let job = ActivitySearchJob::new("c1ccccc1", 5);
        assert_eq!(job.pattern, "c1ccccc1");
        assert_eq!(job.max_results, 5);
        assert_eq!(job.page_size, 20);
    }
}
