//! Data models for the search-and-enrich pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Marker rendered for any field the API did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// A molecule returned by a substructure search page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compound {
    pub chembl_id: String,
    pub name: Option<String>,
    pub smiles: Option<String>,
}

impl Compound {
    pub fn new(chembl_id: impl Into<String>) -> Self {
        Self { chembl_id: chembl_id.into(), name: None, smiles: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_smiles(mut self, smiles: impl Into<String>) -> Self {
        self.smiles = Some(smiles.into());
        self
    }
}

/// One page of search hits.
///
/// `returned` counts every record the API sent, including records dropped
/// for lacking a ChEMBL ID. Only `returned == 0` means the result set is
/// exhausted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub compounds: Vec<Compound>,
    pub returned: usize,
}

impl SearchPage {
    /// A page whose records all carried an ID.
    pub fn new(compounds: Vec<Compound>) -> Self {
        let returned = compounds.len();
        Self { compounds, returned }
    }

    pub fn is_exhausted(&self) -> bool {
        self.returned == 0
    }
}

/// `standard_value` arrives as either a JSON string or a JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StandardValue {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for StandardValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StandardValue::Text(s) => f.write_str(s),
            StandardValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One bioactivity measurement as returned by the activity endpoint.
/// Every field may be absent (`null` or a missing key).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    #[serde(default)]
    pub standard_type: Option<String>,
    #[serde(default)]
    pub standard_value: Option<StandardValue>,
    #[serde(default)]
    pub standard_units: Option<String>,
    #[serde(default)]
    pub target_chembl_id: Option<String>,
}

impl ActivityRecord {
    /// `"value units"`, or `None` when the record carries no value.
    pub fn formatted_value(&self) -> Option<String> {
        let value = self.standard_value.as_ref()?;
        let units = self.standard_units.as_deref().unwrap_or(NOT_AVAILABLE);
        Some(format!("{} {}", value, units))
    }

    pub fn measurement(&self) -> Option<MeasurementType> {
        self.standard_type.as_deref().and_then(MeasurementType::from_standard_type)
    }
}

/// The measurement types kept in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementType {
    Ic50,
    Ki,
    Ec50,
}

impl MeasurementType {
    /// Parses ChEMBL's `standard_type`. Matching is exact: `ic50` is not `IC50`.
    pub fn from_standard_type(s: &str) -> Option<Self> {
        match s {
            "IC50" => Some(MeasurementType::Ic50),
            "Ki"   => Some(MeasurementType::Ki),
            "EC50" => Some(MeasurementType::Ec50),
            _      => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementType::Ic50 => "IC50",
            MeasurementType::Ki   => "Ki",
            MeasurementType::Ec50 => "EC50",
        }
    }
}

/// Reduced bioactivity for one compound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BioactivityProfile {
    pub chembl_id: String,
    pub ic50: Option<String>,
    pub ki: Option<String>,
    pub ec50: Option<String>,
    pub target: Option<String>,
}

impl BioactivityProfile {
    pub fn empty(chembl_id: impl Into<String>) -> Self {
        Self { chembl_id: chembl_id.into(), ..Default::default() }
    }

    pub fn slot(&self, kind: MeasurementType) -> Option<&str> {
        match kind {
            MeasurementType::Ic50 => self.ic50.as_deref(),
            MeasurementType::Ki   => self.ki.as_deref(),
            MeasurementType::Ec50 => self.ec50.as_deref(),
        }
    }

    pub fn slot_mut(&mut self, kind: MeasurementType) -> &mut Option<String> {
        match kind {
            MeasurementType::Ic50 => &mut self.ic50,
            MeasurementType::Ki   => &mut self.ki,
            MeasurementType::Ec50 => &mut self.ec50,
        }
    }
}

/// A compound joined with its bioactivity profile; one output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedResult {
    pub compound: Compound,
    pub profile: BioactivityProfile,
}

impl EnrichedResult {
    pub fn new(compound: Compound, profile: BioactivityProfile) -> Self {
        Self { compound, profile }
    }

    /// Cells in [`ResultTable::HEADER`] order, absent fields rendered as `N/A`.
    pub fn to_row(&self) -> [String; 7] {
        let or_na = |v: Option<&str>| v.unwrap_or(NOT_AVAILABLE).to_string();
        [
            or_na(self.compound.name.as_deref()),
            self.profile.chembl_id.clone(),
            or_na(self.compound.smiles.as_deref()),
            or_na(self.profile.target.as_deref()),
            or_na(self.profile.slot(MeasurementType::Ic50)),
            or_na(self.profile.slot(MeasurementType::Ki)),
            or_na(self.profile.slot(MeasurementType::Ec50)),
        ]
    }
}

/// Rows in the order their lookups completed. That order differs between
/// runs against the same data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultTable {
    rows: Vec<EnrichedResult>,
}

impl ResultTable {
    pub const HEADER: [&'static str; 7] = [
        "Compound Name",
        "ChEMBL ID",
        "SMILES",
        "Target",
        "IC50 (with units)",
        "Ki (with units)",
        "EC50 (with units)",
    ];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: EnrichedResult) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[EnrichedResult] {
        &self.rows
    }
}

/// Counters describing one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub job_id: Uuid,
    pub pattern: String,
    pub pages_fetched: usize,
    pub compounds_seen: usize,
    pub duplicates_skipped: usize,
    pub dispatched: usize,
    pub rows_collected: usize,
    pub lookups_dropped: usize,
    /// Set when paging stopped because a search page failed.
    pub search_error: Option<String>,
    /// Where the table was written; `None` when nothing was written.
    pub output: Option<String>,
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn new(job_id: Uuid, pattern: &str) -> Self {
        Self {
            job_id,
            pattern: pattern.to_string(),
            pages_fetched: 0,
            compounds_seen: 0,
            duplicates_skipped: 0,
            dispatched: 0,
            rows_collected: 0,
            lookups_dropped: 0,
            search_error: None,
            output: None,
            duration_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_measurement_type_is_case_sensitive() {
        assert_eq!(MeasurementType::from_standard_type("IC50"), Some(MeasurementType::Ic50));
        assert_eq!(MeasurementType::from_standard_type("Ki"), Some(MeasurementType::Ki));
        assert_eq!(MeasurementType::from_standard_type("EC50"), Some(MeasurementType::Ec50));
        assert_eq!(MeasurementType::from_standard_type("ic50"), None);
        assert_eq!(MeasurementType::from_standard_type("Kd"), None);
    }

    #[test]
    fn test_measurement_type_wire_names() {
        for kind in [MeasurementType::Ic50, MeasurementType::Ki, MeasurementType::Ec50] {
            assert_eq!(MeasurementType::from_standard_type(kind.as_str()), Some(kind));
        }
        assert_eq!(MeasurementType::Ki.as_str(), "Ki");
    }

    #[test]
    fn test_activity_record_accepts_string_and_number_values() {
        let json = r#"[
            {"standard_type": "IC50", "standard_value": "12.5", "standard_units": "nM", "target_chembl_id": "CHEMBL240"},
            {"standard_type": "Ki", "standard_value": 3, "standard_units": null},
            {"standard_type": "EC50"}
        ]"#;
        let records: Vec<ActivityRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].formatted_value().as_deref(), Some("12.5 nM"));
        assert_eq!(records[1].formatted_value().as_deref(), Some("3 N/A"));
        assert_eq!(records[2].formatted_value(), None);
        assert_eq!(records[2].target_chembl_id, None);
    }

    #[test]
    fn test_row_renders_absent_fields_as_na() {
        let compound = Compound::new("CHEMBL1").with_smiles("Oc1ccccc1O");
        let mut profile = BioactivityProfile::empty("CHEMBL1");
        profile.ic50 = Some("50 nM".to_string());
        let row = EnrichedResult::new(compound, profile).to_row();
        assert_eq!(
            row,
            ["N/A", "CHEMBL1", "Oc1ccccc1O", "N/A", "50 nM", "N/A", "N/A"].map(String::from)
        );
    }

    #[test]
    fn test_result_table_keeps_insertion_order() {
        let mut table = ResultTable::new();
        assert!(table.is_empty());
        for id in ["CHEMBL3", "CHEMBL1", "CHEMBL2"] {
            table.push(EnrichedResult::new(Compound::new(id), BioactivityProfile::empty(id)));
        }
        let ids: Vec<&str> = table.rows().iter().map(|r| r.profile.chembl_id.as_str()).collect();
        assert_eq!(ids, vec!["CHEMBL3", "CHEMBL1", "CHEMBL2"]);
    }
}
