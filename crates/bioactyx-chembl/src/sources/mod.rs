//! Compound source clients.

pub mod chembl;

use async_trait::async_trait;
use bioactyx_common::Result;

use crate::models::{ActivityRecord, SearchPage};

/// The two ChEMBL endpoints the pipeline reads from.
///
/// A non-success HTTP status must surface as `BioactyxError::Status`.
#[async_trait]
pub trait ChemblApi: Send + Sync {
    /// One page of molecules whose SMILES contain `pattern`.
    /// A page with no records at all means the result set is exhausted.
    async fn search_molecules(
        &self,
        pattern: &str,
        limit: usize,
        offset: usize,
    ) -> Result<SearchPage>;

    /// The first `limit` activity records for a molecule, in API order.
    async fn fetch_activities(
        &self,
        chembl_id: &str,
        limit: usize,
    ) -> Result<Vec<ActivityRecord>>;
}
