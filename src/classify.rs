use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use lazy_static::lazy_static;

/// Heuristic school-type category derived from name patterns alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolType {
    Public,
    Private,
    Prep,
    International,
    Unknown,
}

const PREP_MARKERS: &[&str] = &["ACADEMY", "PREP", "PREPARATORY"];

const PRIVATE_MARKERS: &[&str] = &[
    "SAINT ", "ST. ", "BISHOP ", "CATHOLIC", "CHRISTIAN", "LUTHERAN", "METHODIST", "BAPTIST",
    "EPISCOPAL",
];

// In international contexts "college" usually means a secondary school.
const INTERNATIONAL_MARKERS: &[&str] = &[
    "IES ",
    "INSTITUT",
    "LYCEE",
    "GYMNASIUM",
    "SECONDARY SCHOOL",
    "COLLEGE ",
];

const PUBLIC_MARKERS: &[&str] = &[
    " HS",
    "HIGH SCHOOL",
    "H.S.",
    "CENTRAL",
    "EAST ",
    "WEST ",
    "NORTH ",
    "SOUTH ",
];

lazy_static! {
    static ref COMMON_NAMES: HashSet<&'static str> = [
        "CENTRAL",
        "LIBERTY",
        "LINCOLN",
        "WASHINGTON",
        "JEFFERSON",
        "ROOSEVELT",
        "FRANKLIN",
        "MADISON",
        "KENNEDY",
        "WILSON",
        "EAST",
        "WEST",
        "NORTH",
        "SOUTH",
        "NORTHEAST",
        "NORTHWEST",
        "SOUTHEAST",
        "SOUTHWEST",
        "CENTENNIAL",
        "HIGHLAND",
        "RIVERSIDE",
    ]
    .into_iter()
    .collect();
}

/// Categorize a school by name patterns, first match wins: prep markers,
/// then private (religious) markers, then international, then public.
pub fn categorize(name: &str) -> SchoolType {
    if name.trim().is_empty() {
        return SchoolType::Unknown;
    }

    let name_upper = name.to_uppercase();
    let contains_any = |markers: &[&str]| markers.iter().any(|m| name_upper.contains(m));

    if contains_any(PREP_MARKERS) {
        SchoolType::Prep
    } else if contains_any(PRIVATE_MARKERS) {
        SchoolType::Private
    } else if contains_any(INTERNATIONAL_MARKERS) {
        SchoolType::International
    } else if contains_any(PUBLIC_MARKERS) {
        SchoolType::Public
    } else {
        SchoolType::Unknown
    }
}

/// Whether a normalized key is one of the school names shared by many
/// unrelated schools nationwide. Even a single-candidate registry match on
/// one of these deserves extra scrutiny downstream.
pub fn is_common_name(normalized_key: &str) -> bool {
    COMMON_NAMES.contains(normalized_key)
}

/// Whether the school is likely outside the U.S. A non-US country code
/// short-circuits; otherwise the name heuristics decide.
pub fn is_international(name: &str, country: Option<&str>) -> bool {
    if let Some(country) = country {
        if country != "USA" && country != "United States" {
            return true;
        }
    }
    categorize(name) == SchoolType::International
}
