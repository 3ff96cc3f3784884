//! ChEMBL API client.
//!
//! ChEMBL is a database of bioactive molecules with drug-like properties.
//! Two resources are used here:
//!   - `molecule`: substructure search over canonical SMILES
//!   - `activity`: bioactivity measurements (IC50, Ki, EC50, ...) per molecule
//!
//! API docs: https://chembl.gitbook.io/chembl-interface-documentation/web-resources/chembl-api
//! Endpoint: https://www.ebi.ac.uk/chembl/api/data

use async_trait::async_trait;
use bioactyx_common::{BioactyxError, Result, SandboxClient as Client};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::ChemblApi;
use crate::models::{ActivityRecord, Compound, SearchPage};

pub const CHEMBL_API_URL: &str = "https://www.ebi.ac.uk/chembl/api/data";

#[derive(Debug, Deserialize)]
struct MoleculePage {
    #[serde(default)]
    molecules: Vec<MoleculeRecord>,
}

impl MoleculePage {
    fn into_search_page(self) -> SearchPage {
        let returned = self.molecules.len();
        let compounds = self.molecules
            .into_iter()
            .filter_map(MoleculeRecord::into_compound)
            .collect();
        SearchPage { compounds, returned }
    }
}

#[derive(Debug, Deserialize)]
struct MoleculeRecord {
    molecule_chembl_id: Option<String>,
    pref_name: Option<String>,
    molecule_structures: Option<MoleculeStructures>,
}

#[derive(Debug, Deserialize)]
struct MoleculeStructures {
    canonical_smiles: Option<String>,
}

impl MoleculeRecord {
    fn into_compound(self) -> Option<Compound> {
        Some(Compound {
            chembl_id: self.molecule_chembl_id?,
            name: self.pref_name,
            smiles: self.molecule_structures.and_then(|s| s.canonical_smiles),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ActivityPage {
    #[serde(default)]
    activities: Vec<ActivityRecord>,
}

/// ChEMBL client for substructure search and bioactivity lookups.
#[derive(Debug, Clone)]
pub struct ChemblClient {
    client: Client,
    base_url: String,
}

impl ChemblClient {
    pub fn new() -> Result<Self> {
        Ok(Self::with_client(Client::new()?, CHEMBL_API_URL))
    }

    /// Uses `client` against `base_url` (no trailing slash needed).
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, params: &[(&str, String)]) -> Result<T> {
        let resp = self.client
            .get(url)?
            .query(params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BioactyxError::Status { status: status.as_u16(), url: url.to_string() });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ChemblApi for ChemblClient {
    #[instrument(skip(self))]
    async fn search_molecules(
        &self,
        pattern: &str,
        limit: usize,
        offset: usize,
    ) -> Result<SearchPage> {
        let url = format!("{}/molecule", self.base_url);
        let params = [
            ("format", "json".to_string()),
            ("smiles_contains", pattern.to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];

        let page = self.get_json::<MoleculePage>(&url, &params).await?.into_search_page();

        if page.compounds.len() < page.returned {
            debug!(skipped = page.returned - page.compounds.len(), "Molecules without a ChEMBL ID skipped");
        }
        debug!(count = page.compounds.len(), offset, "ChEMBL molecule page returned");

        Ok(page)
    }

    #[instrument(skip(self))]
    async fn fetch_activities(
        &self,
        chembl_id: &str,
        limit: usize,
    ) -> Result<Vec<ActivityRecord>> {
        let url = format!("{}/activity", self.base_url);
        let params = [
            ("molecule_chembl_id", chembl_id.to_string()),
            ("format", "json".to_string()),
            ("limit", limit.to_string()),
        ];

        let page: ActivityPage = self.get_json(&url, &params).await?;
        debug!(count = page.activities.len(), "ChEMBL activities returned");

        Ok(page.activities)
    }
}
