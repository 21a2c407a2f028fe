use std::collections::{BTreeMap, HashMap};

use lazy_static::lazy_static;
use tracing::info;

use crate::canonical::select_canonical;
use crate::normalize::normalize_name;
use crate::records::{
    CanonicalMapping, Confidence, MappingSource, RawSchoolRecord, RosterRow, StandardizedRow,
};

/// Well-known basketball prep schools and academies: (variant, canonical,
/// city, state). These are frequently absent from public school registries,
/// so they are curated by hand rather than matched automatically.
const CURATED_PREP_SCHOOLS: &[(&str, &str, &str, &str)] = &[
    ("IMG Academy", "IMG Academy", "Bradenton", "FL"),
    ("Montverde Academy", "Montverde Academy", "Montverde", "FL"),
    ("Oak Hill Academy", "Oak Hill Academy", "Mouth of Wilson", "VA"),
    ("Brewster Academy", "Brewster Academy", "Wolfeboro", "NH"),
    ("Prolific Prep", "Prolific Prep", "Napa", "CA"),
    ("Spire Academy", "Spire Institute", "Geneva", "OH"),
    ("Spire Institute", "Spire Institute", "Geneva", "OH"),
    ("Link Academy", "Link Academy", "Branson", "MO"),
    ("La Lumiere School", "La Lumiere School", "La Porte", "IN"),
    ("New Hope Academy", "New Hope Christian Academy", "Landover Hills", "MD"),
    (
        "New Hope Christian Academy",
        "New Hope Christian Academy",
        "Landover Hills",
        "MD",
    ),
    (
        "Hamilton Heights Christian Academy",
        "Hamilton Heights Christian Academy",
        "Chattanooga",
        "TN",
    ),
    (
        "Northfield Mount Hermon",
        "Northfield Mount Hermon School",
        "Gill",
        "MA",
    ),
    (
        "Northfield Mount Hermon School",
        "Northfield Mount Hermon School",
        "Gill",
        "MA",
    ),
    ("South Kent School", "South Kent School", "South Kent", "CT"),
    (
        "Wilbraham & Monson Academy",
        "Wilbraham & Monson Academy",
        "Wilbraham",
        "MA",
    ),
    ("Westtown School", "Westtown School", "West Chester", "PA"),
    ("Worcester Academy", "Worcester Academy", "Worcester", "MA"),
    (
        "The Governor's Academy",
        "The Governor's Academy",
        "Byfield",
        "MA",
    ),
    ("Governors Academy", "The Governor's Academy", "Byfield", "MA"),
    ("Blair Academy", "Blair Academy", "Blairstown", "NJ"),
    (
        "Putnam Science Academy",
        "Putnam Science Academy",
        "Putnam",
        "CT",
    ),
    ("St. Andrew's School", "St. Andrew's School", "Barrington", "RI"),
    ("Tabor Academy", "Tabor Academy", "Marion", "MA"),
    (
        "Choate Rosemary Hall",
        "Choate Rosemary Hall",
        "Wallingford",
        "CT",
    ),
];

lazy_static! {
    static ref CURATED_MAPPING: Vec<CanonicalMapping> = CURATED_PREP_SCHOOLS
        .iter()
        .map(|(original, standardized, city, state)| CanonicalMapping {
            original_name: original.to_string(),
            standardized_name: standardized.to_string(),
            state: state.to_string(),
            city: Some(city.to_string()),
            confidence: Confidence::HighManual,
            source: MappingSource::PrepSchoolCurated,
            occurrence_count: 0,
            canonical_occurrence_count: 0,
            notes: Some("Manually curated prep/basketball academy".to_string()),
        })
        .collect();
}

/// The hand-maintained prep-school mapping table.
pub fn curated_mapping() -> Vec<CanonicalMapping> {
    CURATED_MAPPING.clone()
}

/// Build the original -> canonical mapping from duplicate name variants.
///
/// Records are grouped by normalized key (and state, when `group_by_state`
/// is set). Singleton groups map to themselves with `no_variation`;
/// multi-member groups all point at the selected canonical spelling.
/// Grouping uses an ordered map so output order is deterministic.
pub fn build_duplicate_mapping(
    records: &[RawSchoolRecord],
    group_by_state: bool,
) -> Vec<CanonicalMapping> {
    let mut groups: BTreeMap<(String, String), Vec<&RawSchoolRecord>> = BTreeMap::new();

    for record in records {
        let key = normalize_name(&record.original_name);
        let state_key = if group_by_state {
            record.state.clone().unwrap_or_default()
        } else {
            String::new()
        };
        groups.entry((key, state_key)).or_default().push(record);
    }

    let mut mappings = Vec::new();

    for ((_, group_state), group) in &groups {
        if let [only] = group.as_slice() {
            mappings.push(CanonicalMapping {
                original_name: only.original_name.clone(),
                standardized_name: only.original_name.clone(),
                state: only.state.clone().unwrap_or_default(),
                city: None,
                confidence: Confidence::HighAuto,
                source: MappingSource::NoVariation,
                occurrence_count: only.occurrence_count,
                canonical_occurrence_count: only.occurrence_count,
                notes: None,
            });
            continue;
        }

        let owned: Vec<RawSchoolRecord> = group.iter().map(|r| (*r).clone()).collect();
        let canonical = select_canonical(&owned);

        for record in group {
            let state = if group_by_state {
                group_state.clone()
            } else {
                record.state.clone().unwrap_or_default()
            };
            mappings.push(CanonicalMapping {
                original_name: record.original_name.clone(),
                standardized_name: canonical.original_name.clone(),
                state,
                city: None,
                confidence: Confidence::HighAuto,
                source: MappingSource::DuplicateResolution,
                occurrence_count: record.occurrence_count,
                canonical_occurrence_count: canonical.occurrence_count,
                notes: None,
            });
        }
    }

    mappings
}

/// Build the complete standardization mapping: automated duplicate
/// resolution, optionally overlaid with the curated prep-school table.
/// Curated entries win conflicts on `original_name`; the result has exactly
/// one entry per distinct original name.
pub fn build_complete_mapping(
    records: &[RawSchoolRecord],
    include_curated: bool,
    group_by_state: bool,
) -> Vec<CanonicalMapping> {
    let mut mappings = build_duplicate_mapping(records, group_by_state);

    if include_curated {
        let mut index_by_original: HashMap<String, usize> = mappings
            .iter()
            .enumerate()
            .map(|(idx, m)| (m.original_name.clone(), idx))
            .collect();

        for curated in curated_mapping() {
            match index_by_original.get(&curated.original_name) {
                Some(&idx) => mappings[idx] = curated,
                None => {
                    index_by_original.insert(curated.original_name.clone(), mappings.len());
                    mappings.push(curated);
                }
            }
        }
    }

    info!(entries = mappings.len(), "Built standardization mapping");
    mappings
}

/// Apply a mapping table to roster rows. Unmapped names pass through
/// unchanged with `unstandardized` confidence; absence is an expected
/// outcome, not an error.
pub fn apply_mapping(rows: &[RosterRow], mapping: &[CanonicalMapping]) -> Vec<StandardizedRow> {
    let lookup: HashMap<&str, &CanonicalMapping> = mapping
        .iter()
        .map(|m| (m.original_name.as_str(), m))
        .collect();

    rows.iter()
        .map(|row| {
            let (standardized_name, confidence) = match lookup.get(row.original_name.as_str()) {
                Some(entry) => (entry.standardized_name.clone(), entry.confidence),
                None => (row.original_name.clone(), Confidence::Unstandardized),
            };
            let was_changed = standardized_name != row.original_name;
            StandardizedRow {
                original_name: row.original_name.clone(),
                standardized_name,
                confidence,
                was_changed,
            }
        })
        .collect()
}
