use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Order matters: longer suffix patterns are tried first, and exactly one
    // trailing suffix is stripped.
    static ref SUFFIX_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\s+HIGH\s+SCHOOL$").unwrap(),
        Regex::new(r"\s+H\.S\.$").unwrap(),
        Regex::new(r"\s+HS$").unwrap(),
        Regex::new(r"\s+H\.S$").unwrap(),
    ];
    static ref SAINT_RE: Regex = Regex::new(r"\bST\.?\s+").unwrap();
    static ref PUNCT_RE: Regex = Regex::new(r"[.,']").unwrap();
    static ref TRAILING_PAREN_RE: Regex = Regex::new(r"\s*\([^)]+\)$").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref DISAMBIGUATOR_RE: Regex = Regex::new(r"\(([^)]+)\)$").unwrap();
}

/// Create the normalized matching key for a high-school name.
///
/// The key is used solely for equality-based grouping and lookup, so the
/// transform is conservative: uppercase, strip one trailing school suffix,
/// standardize St./Saint, drop periods/commas/apostrophes, drop a trailing
/// parenthetical note, collapse whitespace. Blank input yields an empty key.
///
/// ```
/// use hs_standardize::normalize::normalize_name;
///
/// assert_eq!(normalize_name("Central High School"), "CENTRAL");
/// assert_eq!(normalize_name("St. Mary's H.S."), "SAINT MARYS");
/// assert_eq!(normalize_name("Lincoln HS (North)"), "LINCOLN");
/// ```
pub fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut normalized = trimmed.to_uppercase();

    for pattern in SUFFIX_PATTERNS.iter() {
        if pattern.is_match(&normalized) {
            normalized = pattern.replace(&normalized, "").into_owned();
            break;
        }
    }

    normalized = SAINT_RE.replace_all(&normalized, "SAINT ").into_owned();
    normalized = PUNCT_RE.replace_all(&normalized, "").into_owned();
    normalized = TRAILING_PAREN_RE.replace(&normalized, "").into_owned();
    normalized = WHITESPACE_RE.replace_all(&normalized, " ").into_owned();

    normalized.trim().to_string()
}

/// Extract disambiguating text from a trailing parenthetical, e.g.
/// "Central High School (Phoenix)" -> "Phoenix". Empty string when absent.
pub fn extract_disambiguator(name: &str) -> String {
    DISAMBIGUATOR_RE
        .captures(name.trim_end())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Rewrite a school-name suffix to a uniform style for display.
///
/// Only names that already carry some school suffix (High School / HS /
/// H.S.) are rewritten; anything else comes back unchanged, so academies
/// and prep schools keep their own naming. The default preferred suffix is
/// "H.S." to avoid confusion with similarly-named colleges.
pub fn standardize_suffix(name: &str, preferred_suffix: &str) -> String {
    if name.trim().is_empty() {
        return name.to_string();
    }

    let base = normalize_name(name);
    let name_upper = name.to_uppercase();
    let had_suffix = ["HIGH SCHOOL", "HS", "H.S."]
        .iter()
        .any(|suffix| name_upper.contains(suffix));

    if had_suffix && !base.is_empty() {
        format!("{} {}", title_case(&base), preferred_suffix)
    } else {
        name.to_string()
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_suffixes() {
        assert_eq!(normalize_name("Central High School"), "CENTRAL");
        assert_eq!(normalize_name("Central HS"), "CENTRAL");
        assert_eq!(normalize_name("Central H.S."), "CENTRAL");
        assert_eq!(normalize_name("Central H.S"), "CENTRAL");
    }

    #[test]
    fn test_normalize_saint() {
        assert_eq!(normalize_name("St. Mary's H.S."), "SAINT MARYS");
        assert_eq!(normalize_name("St Joseph HS"), "SAINT JOSEPH");
        // "ST" inside a longer word must not be rewritten
        assert_eq!(normalize_name("West Orange High School"), "WEST ORANGE");
    }

    #[test]
    fn test_normalize_parenthetical() {
        assert_eq!(normalize_name("Lincoln HS (North)"), "LINCOLN");
        assert_eq!(normalize_name("Tappan Zee (Saint Rose)"), "TAPPAN ZEE");
    }

    #[test]
    fn test_normalize_blank_input() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_name("  Central   Valley   HS "), "CENTRAL VALLEY");
    }

    #[test]
    fn test_normalize_idempotent() {
        for name in [
            "Central High School",
            "St. Mary's H.S.",
            "Lincoln HS (North)",
            "IMG Academy",
            "",
        ] {
            let once = normalize_name(name);
            assert_eq!(normalize_name(&once), once);
        }
    }

    #[test]
    fn test_extract_disambiguator() {
        assert_eq!(extract_disambiguator("Central High School (Phoenix)"), "Phoenix");
        assert_eq!(extract_disambiguator("Lincoln HS"), "");
        assert_eq!(extract_disambiguator(""), "");
    }

    #[test]
    fn test_standardize_suffix() {
        assert_eq!(standardize_suffix("Central HS", "H.S."), "Central H.S.");
        assert_eq!(standardize_suffix("Lincoln High School", "H.S."), "Lincoln H.S.");
        assert_eq!(
            standardize_suffix("Lincoln H.S.", "High School"),
            "Lincoln High School"
        );
        // No school suffix: returned unchanged
        assert_eq!(standardize_suffix("IMG Academy", "H.S."), "IMG Academy");
        assert_eq!(standardize_suffix("", "H.S."), "");
    }
}
