use serde::{Deserialize, Serialize};

/// One observed (name, state, frequency) triple from a roster dataset.
/// Many records may share a normalized key; `occurrence_count` is how many
/// roster rows used this exact spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSchoolRecord {
    pub original_name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default = "default_occurrence_count")]
    pub occurrence_count: u64,
}

fn default_occurrence_count() -> u64 {
    1
}

impl RawSchoolRecord {
    pub fn new(original_name: impl Into<String>, state: Option<&str>, occurrence_count: u64) -> Self {
        Self {
            original_name: original_name.into(),
            state: state.map(|s| s.to_string()),
            occurrence_count,
        }
    }
}

/// Trust label on a produced mapping entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    HighAuto,
    HighManual,
    Unstandardized,
}

/// How a mapping entry was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingSource {
    NoVariation,
    DuplicateResolution,
    PrepSchoolCurated,
}

/// One row of the standardization mapping table: original spelling to the
/// canonical display name, with provenance metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMapping {
    pub original_name: String,
    pub standardized_name: String,
    pub state: String,
    #[serde(default)]
    pub city: Option<String>,
    pub confidence: Confidence,
    pub source: MappingSource,
    pub occurrence_count: u64,
    pub canonical_occurrence_count: u64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Which registry source a reference record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryOrigin {
    Public,
    Private,
}

/// One row from the external school registry, reduced to the fields the
/// matcher needs. Missing fields are empty strings, never load failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub registry_id: String,
    pub official_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub origin: RegistryOrigin,
}

/// One input row for the mapping applier / batch registry matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
    pub original_name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// Applier output: the roster name stamped with its standardized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizedRow {
    pub original_name: String,
    pub standardized_name: String,
    pub confidence: Confidence,
    pub was_changed: bool,
}

/// Registry match confidence carried on batch-match output rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchConfidence {
    Exact,
    Ambiguous,
}

/// Batch registry-match output: the roster fields plus the matched registry
/// record's columns when a match was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryMatchRow {
    pub original_name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub registry_id: Option<String>,
    #[serde(default)]
    pub matched_name: Option<String>,
    #[serde(default)]
    pub registry_street: Option<String>,
    #[serde(default)]
    pub registry_city: Option<String>,
    #[serde(default)]
    pub registry_state: Option<String>,
    #[serde(default)]
    pub registry_zip: Option<String>,
    #[serde(default)]
    pub registry_origin: Option<RegistryOrigin>,
    #[serde(default)]
    pub match_confidence: Option<MatchConfidence>,
}

/// Outcome of resolving a raw name against the registry index.
///
/// Ambiguity is a first-class result, not an error: the caller gets the
/// first surviving candidate plus the surviving-candidate count and must
/// decide how much to trust it.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    NoMatch,
    Exact(ReferenceRecord),
    Ambiguous {
        candidate: ReferenceRecord,
        num_candidates: usize,
    },
}

impl MatchResult {
    pub fn record(&self) -> Option<&ReferenceRecord> {
        match self {
            MatchResult::NoMatch => None,
            MatchResult::Exact(r) => Some(r),
            MatchResult::Ambiguous { candidate, .. } => Some(candidate),
        }
    }

    pub fn confidence(&self) -> Option<MatchConfidence> {
        match self {
            MatchResult::NoMatch => None,
            MatchResult::Exact(_) => Some(MatchConfidence::Exact),
            MatchResult::Ambiguous { .. } => Some(MatchConfidence::Ambiguous),
        }
    }
}
