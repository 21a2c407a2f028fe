use std::collections::HashMap;

use tracing::info;

use crate::normalize::{normalize_name, standardize_suffix};
use crate::records::{MatchResult, ReferenceRecord, RegistryMatchRow, RosterRow};

/// Lookup index over the external school registry, keyed by normalized name.
///
/// Built once per registry snapshot and read-only afterwards. Records whose
/// official name normalizes to an empty key are unmatchable and excluded.
/// Within a bucket the snapshot's load order is preserved; that order is
/// implementation-defined and only guarantees determinism within one index,
/// not any notion of "best" candidate.
pub struct RegistryIndex {
    buckets: HashMap<String, Vec<ReferenceRecord>>,
    len: usize,
}

impl RegistryIndex {
    pub fn build(records: Vec<ReferenceRecord>) -> Self {
        let mut buckets: HashMap<String, Vec<ReferenceRecord>> = HashMap::new();
        let mut len = 0;

        for record in records {
            let key = normalize_name(&record.official_name);
            if key.is_empty() {
                continue;
            }
            buckets.entry(key).or_default().push(record);
            len += 1;
        }

        info!(records = len, keys = buckets.len(), "Built registry index");
        Self { buckets, len }
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Resolve a school name against the registry, disambiguating multiple
    /// same-key candidates by state, then city.
    ///
    /// Each filter either narrows to exactly one candidate (exact match),
    /// narrows to a smaller nonempty set (carried into the next filter), or
    /// eliminates everything (ignored, the previous set is kept). State runs
    /// before city because it is the stronger and more reliably populated
    /// field in roster data.
    pub fn resolve(&self, name: &str, state: Option<&str>, city: Option<&str>) -> MatchResult {
        let key = normalize_name(name);
        if key.is_empty() {
            return MatchResult::NoMatch;
        }

        let candidates = match self.buckets.get(&key) {
            Some(candidates) => candidates,
            None => return MatchResult::NoMatch,
        };

        if let [only] = candidates.as_slice() {
            return MatchResult::Exact(only.clone());
        }

        let mut survivors: Vec<&ReferenceRecord> = candidates.iter().collect();

        for (field, value) in [
            (FilterField::State, state),
            (FilterField::City, city),
        ] {
            let value = match value.map(str::trim).filter(|v| !v.is_empty()) {
                Some(value) => value,
                None => continue,
            };

            let filtered: Vec<&ReferenceRecord> = survivors
                .iter()
                .copied()
                .filter(|r| field.get(r).eq_ignore_ascii_case(value))
                .collect();

            match filtered.len() {
                1 => return MatchResult::Exact(filtered[0].clone()),
                0 => {} // filter eliminated everything: keep the previous set
                _ => survivors = filtered,
            }
        }

        if let [only] = survivors.as_slice() {
            MatchResult::Exact((*only).clone())
        } else {
            MatchResult::Ambiguous {
                candidate: survivors[0].clone(),
                num_candidates: survivors.len(),
            }
        }
    }

    /// Registry-backed display name for a school. On any match (exact or
    /// ambiguous) this is the registry's official name, rewritten to carry a
    /// uniform "H.S." suffix unless it already names its school type; on no
    /// match, the input itself is suffix-normalized. Never fails.
    pub fn standardized_display_name(
        &self,
        name: &str,
        state: Option<&str>,
        city: Option<&str>,
        add_suffix: bool,
    ) -> String {
        match self.resolve(name, state, city).record() {
            Some(record) => {
                let official = &record.official_name;
                if add_suffix
                    && !official.contains("H.S.")
                    && !official.contains("High School")
                {
                    standardize_suffix(official, "H.S.")
                } else {
                    official.clone()
                }
            }
            None => {
                if add_suffix {
                    standardize_suffix(name, "H.S.")
                } else {
                    name.to_string()
                }
            }
        }
    }

    /// Resolve a batch of roster rows. Rows are independent; unmatched rows
    /// keep empty registry columns.
    pub fn batch_match(&self, rows: &[RosterRow]) -> Vec<RegistryMatchRow> {
        let mut matched = 0usize;

        let result: Vec<RegistryMatchRow> = rows
            .iter()
            .map(|row| {
                let outcome = self.resolve(
                    &row.original_name,
                    row.state.as_deref(),
                    row.city.as_deref(),
                );
                let confidence = outcome.confidence();
                let record = outcome.record();
                if record.is_some() {
                    matched += 1;
                }
                RegistryMatchRow {
                    original_name: row.original_name.clone(),
                    state: row.state.clone(),
                    city: row.city.clone(),
                    registry_id: record.map(|r| r.registry_id.clone()),
                    matched_name: record.map(|r| r.official_name.clone()),
                    registry_street: record.map(|r| r.street.clone()),
                    registry_city: record.map(|r| r.city.clone()),
                    registry_state: record.map(|r| r.state.clone()),
                    registry_zip: record.map(|r| r.zip.clone()),
                    registry_origin: record.map(|r| r.origin),
                    match_confidence: confidence,
                }
            })
            .collect();

        info!(
            matched,
            total = rows.len(),
            "Registry batch match complete"
        );
        result
    }
}

#[derive(Clone, Copy)]
enum FilterField {
    State,
    City,
}

impl FilterField {
    fn get(self, record: &ReferenceRecord) -> &str {
        match self {
            FilterField::State => &record.state,
            FilterField::City => &record.city,
        }
    }
}
