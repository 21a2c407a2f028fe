use std::fs;
use std::path::PathBuf;

use hs_standardize::error::StandardizeError;
use hs_standardize::loader;
use hs_standardize::mapping::{apply_mapping, build_complete_mapping};
use hs_standardize::records::{
    Confidence, MappingSource, MatchConfidence, MatchResult, RawSchoolRecord, RosterRow,
};
use hs_standardize::registry::RegistryIndex;

fn temp_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hs_standardize_it_{}", label));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_end_to_end_mapping() {
    // Roster: one curated academy plus two spellings of the same CA school
    let records = vec![
        RawSchoolRecord::new("IMG Academy", Some("FL"), 50),
        RawSchoolRecord::new("Central HS", Some("CA"), 10),
        RawSchoolRecord::new("Central High School", Some("CA"), 15),
    ];

    let mapping = build_complete_mapping(&records, true, true);

    let img = mapping
        .iter()
        .find(|m| m.original_name == "IMG Academy")
        .unwrap();
    assert_eq!(img.standardized_name, "IMG Academy");
    assert_eq!(img.source, MappingSource::PrepSchoolCurated);
    assert_eq!(img.confidence, Confidence::HighManual);

    for original in ["Central HS", "Central High School"] {
        let entry = mapping
            .iter()
            .find(|m| m.original_name == original)
            .unwrap();
        assert_eq!(entry.standardized_name, "Central High School");
        assert_eq!(entry.source, MappingSource::DuplicateResolution);
        assert_eq!(entry.confidence, Confidence::HighAuto);
    }

    // Apply the mapping back to roster rows
    let rows = vec![
        RosterRow {
            original_name: "Central HS".to_string(),
            state: Some("CA".to_string()),
            city: None,
        },
        RosterRow {
            original_name: "Brand New School".to_string(),
            state: None,
            city: None,
        },
    ];
    let standardized = apply_mapping(&rows, &mapping);

    assert_eq!(standardized[0].standardized_name, "Central High School");
    assert!(standardized[0].was_changed);
    assert_eq!(standardized[1].standardized_name, "Brand New School");
    assert!(!standardized[1].was_changed);
    assert_eq!(standardized[1].confidence, Confidence::Unstandardized);
}

#[test]
fn test_registry_pipeline_from_csv_snapshots() {
    let dir = temp_dir("registry");

    fs::write(
        dir.join("public_directory_2023.csv"),
        "NCESSCH,SCH_NAME,LSTREET1,LSTREET2,LCITY,LSTATE,LZIP,LEVEL\n\
         040001000001,Central High School,4525 N Central Ave,,Phoenix,AZ,85012,3\n\
         060001000001,Central High School,1234 E St,,Fresno,CA,93706,3\n\
         060001000002,Central Elementary,9 Low St,,Fresno,CA,93706,1\n\
         310001000001,Lincoln High School,2229 J St,,Lincoln,NE,68510,3\n",
    )
    .unwrap();
    fs::write(
        dir.join("private_survey_2021.csv"),
        "PPIN,PINST,PADDRS,PCITY,PSTATE,PZIP,LEVEL\n\
         A0100001,St. Mary's H.S.,10 Church St,Albany,NY,12201,3\n",
    )
    .unwrap();

    let reference = loader::load_registry(&dir, true).unwrap();
    // Elementary row filtered out: 3 public high schools + 1 private
    assert_eq!(reference.len(), 4);

    let index = RegistryIndex::build(reference);
    assert_eq!(index.len(), 4);

    // Same-key candidates in two states: state disambiguates
    match index.resolve("Central HS", Some("AZ"), None) {
        MatchResult::Exact(record) => {
            assert_eq!(record.registry_id, "040001000001");
            assert_eq!(record.city, "Phoenix");
        }
        other => panic!("expected exact match, got {:?}", other),
    }

    // Private snapshot is matchable through the same key space
    match index.resolve("Saint Marys", Some("NY"), None) {
        MatchResult::Exact(record) => assert_eq!(record.registry_id, "A0100001"),
        other => panic!("expected exact match, got {:?}", other),
    }

    // No state supplied: both Centrals survive
    match index.resolve("Central High School", None, None) {
        MatchResult::Ambiguous { num_candidates, .. } => assert_eq!(num_candidates, 2),
        other => panic!("expected ambiguous match, got {:?}", other),
    }

    let rows = vec![
        RosterRow {
            original_name: "Central H.S.".to_string(),
            state: Some("CA".to_string()),
            city: Some("Fresno".to_string()),
        },
        RosterRow {
            original_name: "Hogwarts".to_string(),
            state: None,
            city: None,
        },
    ];
    let matches = index.batch_match(&rows);

    assert_eq!(matches[0].registry_id.as_deref(), Some("060001000001"));
    assert_eq!(matches[0].match_confidence, Some(MatchConfidence::Exact));
    assert!(matches[1].registry_id.is_none());

    let out = dir.join("matches.csv");
    loader::write_match_csv(&out, &matches).unwrap();
    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("exact"));
    assert!(written.contains("Hogwarts"));
}

#[test]
fn test_registry_display_name_never_fails() {
    let dir = temp_dir("display");
    fs::write(
        dir.join("public_directory_2023.csv"),
        "NCESSCH,SCH_NAME,LCITY,LSTATE,LZIP,LEVEL\n\
         1,Lincoln High School,Lincoln,NE,68510,3\n",
    )
    .unwrap();

    let index = RegistryIndex::build(loader::load_registry(&dir, true).unwrap());

    // Matched: official name already carries a school-type suffix
    assert_eq!(
        index.standardized_display_name("Lincoln HS", Some("NE"), None, true),
        "Lincoln High School"
    );
    // Unmatched: the input itself is suffix-normalized
    assert_eq!(
        index.standardized_display_name("Roosevelt H.S.", None, None, true),
        "Roosevelt H.S."
    );
}

#[test]
fn test_missing_registry_is_reported_not_swallowed() {
    let dir = temp_dir("missing");
    match loader::load_registry(&dir, true) {
        Err(StandardizeError::MissingInput(message)) => {
            assert!(message.contains(dir.to_str().unwrap()));
        }
        other => panic!(
            "expected MissingInput, got {:?}",
            other.map(|records| records.len())
        ),
    }
}
