//! In-memory ChEMBL stand-in for pipeline tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bioactyx_chembl::models::StandardValue;
use bioactyx_chembl::{ActivityRecord, ChemblApi, Compound, ResultTable, SearchPage, TableSink};
use bioactyx_common::{BioactyxError, Result};

/// Scripted search pages keyed by offset, plus per-compound activity lists.
/// Offsets without a scripted page return an empty page.
#[derive(Default)]
pub struct MockChembl {
    pages: HashMap<usize, SearchPage>,
    failing_offsets: HashSet<usize>,
    endless_page_size: Option<usize>,
    activities: HashMap<String, Vec<ActivityRecord>>,
    failing_lookups: HashSet<String>,
    lookup_delay: Option<Duration>,
    lookup_delays: HashMap<String, Duration>,
    pub search_calls: AtomicUsize,
    pub activity_calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    looked_up: Mutex<Vec<String>>,
}

impl MockChembl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, offset: usize, compounds: Vec<Compound>) -> Self {
        self.pages.insert(offset, SearchPage::new(compounds));
        self
    }

    /// A page of `count` records that all lack a ChEMBL ID.
    pub fn with_idless_page(mut self, offset: usize, count: usize) -> Self {
        self.pages.insert(offset, SearchPage { compounds: Vec::new(), returned: count });
        self
    }

    pub fn with_failing_page(mut self, offset: usize) -> Self {
        self.failing_offsets.insert(offset);
        self
    }

    /// Every offset returns a full page of fresh compounds.
    pub fn endless(mut self, page_size: usize) -> Self {
        self.endless_page_size = Some(page_size);
        self
    }

    pub fn with_activities(mut self, chembl_id: &str, records: Vec<ActivityRecord>) -> Self {
        self.activities.insert(chembl_id.to_string(), records);
        self
    }

    pub fn with_failing_lookup(mut self, chembl_id: &str) -> Self {
        self.failing_lookups.insert(chembl_id.to_string());
        self
    }

    pub fn with_lookup_delay(mut self, delay: Duration) -> Self {
        self.lookup_delay = Some(delay);
        self
    }

    /// Delay for one compound's lookup, overriding the shared delay.
    pub fn with_lookup_delay_for(mut self, chembl_id: &str, delay: Duration) -> Self {
        self.lookup_delays.insert(chembl_id.to_string(), delay);
        self
    }

    pub fn searches(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn lookups(&self) -> usize {
        self.activity_calls.load(Ordering::SeqCst)
    }

    pub fn looked_up_ids(&self) -> Vec<String> {
        self.looked_up.lock().expect("mock poisoned").clone()
    }
}

#[async_trait]
impl ChemblApi for MockChembl {
    async fn search_molecules(&self, _pattern: &str, limit: usize, offset: usize) -> Result<SearchPage> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);

        if self.failing_offsets.contains(&offset) {
            return Err(BioactyxError::Status { status: 500, url: format!("mock://molecule?offset={offset}") });
        }
        if let Some(size) = self.endless_page_size {
            return Ok(SearchPage::new(compounds(offset..offset + size.min(limit))));
        }
        Ok(self.pages.get(&offset).cloned().unwrap_or_default())
    }

    async fn fetch_activities(&self, chembl_id: &str, _limit: usize) -> Result<Vec<ActivityRecord>> {
        self.activity_calls.fetch_add(1, Ordering::SeqCst);
        self.looked_up.lock().expect("mock poisoned").push(chembl_id.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let delay = self.lookup_delays.get(chembl_id).copied().or(self.lookup_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_lookups.contains(chembl_id) {
            return Err(BioactyxError::Status { status: 404, url: format!("mock://activity?id={chembl_id}") });
        }
        Ok(self.activities
            .get(chembl_id)
            .cloned()
            .unwrap_or_else(|| vec![activity("IC50", "100", "nM", "CHEMBL240")]))
    }
}

/// Sink that keeps written tables in memory.
#[derive(Default)]
pub struct MemorySink {
    pub tables: Vec<ResultTable>,
}

impl TableSink for MemorySink {
    fn write_table(&mut self, table: &ResultTable) -> Result<String> {
        self.tables.push(table.clone());
        Ok("memory".to_string())
    }
}

pub fn compound(chembl_id: &str) -> Compound {
    Compound::new(chembl_id)
        .with_name(format!("NAME {chembl_id}"))
        .with_smiles("Oc1ccccc1O")
}

pub fn compounds(ids: std::ops::Range<usize>) -> Vec<Compound> {
    ids.map(|i| compound(&format!("CHEMBL{i}"))).collect()
}

pub fn activity(kind: &str, value: &str, units: &str, target: &str) -> ActivityRecord {
    ActivityRecord {
        standard_type: Some(kind.to_string()),
        standard_value: Some(StandardValue::Text(value.to_string())),
        standard_units: Some(units.to_string()),
        target_chembl_id: Some(target.to_string()),
    }
}
