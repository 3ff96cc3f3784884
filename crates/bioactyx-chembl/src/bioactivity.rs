//! Bioactivity lookup and reduction for a single compound.
//!
//! Only the first page of activity records is consulted, so measurement
//! types that ChEMBL lists beyond `limit` records are never seen.

use tracing::{debug, trace, warn};

use crate::models::{ActivityRecord, BioactivityProfile};
use crate::sources::ChemblApi;

/// Default number of activity records requested per compound.
pub const DEFAULT_ACTIVITY_LIMIT: usize = 10;

/// Reduces activity records to one value per measurement type.
///
/// Records are scanned in order. A present target overwrites the previous
/// target, and a present IC50/Ki/EC50 value overwrites the previous value of
/// the same type, so the last record wins in both cases.
pub fn reduce_activities(chembl_id: &str, records: &[ActivityRecord]) -> BioactivityProfile {
    let mut profile = BioactivityProfile::empty(chembl_id);

    for record in records {
        if let Some(target) = &record.target_chembl_id {
            profile.target = Some(target.clone());
        }

        let Some(kind) = record.measurement() else { continue };
        if let Some(value) = record.formatted_value() {
            if let Some(previous) = profile.slot_mut(kind).replace(value) {
                trace!(chembl_id, measurement = kind.as_str(), %previous, "Earlier value replaced");
            }
        }
    }

    profile
}

/// Fetches and reduces the activities of one compound.
///
/// Returns `None` when the lookup fails for any reason; the caller drops the
/// compound from the report.
pub async fn fetch_bioactivity(
    api: &dyn ChemblApi,
    chembl_id: &str,
    limit: usize,
) -> Option<BioactivityProfile> {
    match api.fetch_activities(chembl_id, limit).await {
        Ok(records) => {
            debug!(chembl_id, records = records.len(), "Reducing activity records");
            Some(reduce_activities(chembl_id, &records))
        }
        Err(e) => {
            warn!(chembl_id, status = ?e.status_code(), "Bioactivity lookup failed: {}", e);
            None
        }
    }
}
