//! bioactyx-chembl — ChEMBL substructure search enriched with bioactivity.
//! - Paginated molecule search (ChEMBL `molecule` resource)
//! - Deduplication by ChEMBL ID
//! - Bounded-parallel activity lookups and IC50/Ki/EC50 reduction
//! - Report export

pub mod bioactivity;
pub mod dedup;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod sources;

pub use export::{CsvFileSink, TableSink};
pub use models::{ActivityRecord, BioactivityProfile, Compound, EnrichedResult, ResultTable, RunSummary, SearchPage};
pub use pipeline::{collect_results, run_activity_search, ActivitySearchJob};
pub use sources::{chembl::ChemblClient, ChemblApi};
