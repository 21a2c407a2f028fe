use crate::records::RawSchoolRecord;

/// Score a raw spelling for canonical-name selection. Preference order:
/// the full "High School" phrase, then a bare " HS", with a penalty per
/// period so "Central H.S." loses to cleaner spellings.
fn score_name(name: &str) -> i64 {
    let mut score = 0;
    if name.contains("High School") {
        score += 100;
    } else if name.contains(" HS") && !name.contains("H.S.") {
        score += 50;
    }
    score -= name.matches('.').count() as i64 * 10;
    score
}

/// Select the canonical spelling from a group of records that share a
/// normalized key (and state, when state-scoped).
///
/// Strategy, in order: highest occurrence count; then the name score above;
/// then first alphabetically. The alphabetical fallback is a total order,
/// so the choice is deterministic even when the group is reordered.
///
/// The group must be non-empty; the mapping builder guarantees this.
pub fn select_canonical(group: &[RawSchoolRecord]) -> &RawSchoolRecord {
    debug_assert!(!group.is_empty());

    let max_count = group
        .iter()
        .map(|r| r.occurrence_count)
        .max()
        .unwrap_or_default();

    let mut top: Vec<&RawSchoolRecord> = group
        .iter()
        .filter(|r| r.occurrence_count == max_count)
        .collect();

    if top.len() == 1 {
        return top[0];
    }

    top.sort_by(|a, b| {
        score_name(&b.original_name)
            .cmp(&score_name(&a.original_name))
            .then_with(|| a.original_name.cmp(&b.original_name))
    });

    top[0]
}
