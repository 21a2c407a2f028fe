use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use tracing::{info, warn};

use crate::error::{Result, StandardizeError};
use crate::records::{
    CanonicalMapping, RawSchoolRecord, ReferenceRecord, RegistryMatchRow, RegistryOrigin,
    RosterRow,
};

const PUBLIC_SNAPSHOT_PREFIX: &str = "public_directory_";
const PRIVATE_SNAPSHOT_PREFIX: &str = "private_survey_";

/// Find the newest public-directory snapshot in a data directory. Snapshot
/// filenames embed the year, so the lexicographically greatest name wins.
pub fn find_latest_public_file(data_dir: &Path) -> Option<PathBuf> {
    find_latest_snapshot(data_dir, PUBLIC_SNAPSHOT_PREFIX)
}

/// Find the newest private-survey snapshot in a data directory.
pub fn find_latest_private_file(data_dir: &Path) -> Option<PathBuf> {
    find_latest_snapshot(data_dir, PRIVATE_SNAPSHOT_PREFIX)
}

fn find_latest_snapshot(data_dir: &Path, prefix: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(data_dir).ok()?;
    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map_or(false, |name| name.starts_with(prefix) && name.ends_with(".csv"))
        })
        .sorted()
        .last()
}

/// Case-insensitive header lookup over a CSV record. Registry snapshots
/// vary header casing between years; values for absent columns degrade to
/// empty strings.
struct HeaderMap {
    positions: HashMap<String, usize>,
}

impl HeaderMap {
    fn new(headers: &csv::StringRecord) -> Self {
        let positions = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.trim().to_uppercase(), idx))
            .collect();
        Self { positions }
    }

    fn value<'r>(&self, record: &'r csv::StringRecord, column: &str) -> &'r str {
        self.positions
            .get(column)
            .and_then(|&idx| record.get(idx))
            .unwrap_or("")
            .trim()
    }

    fn first_present(&self, columns: &[&str]) -> Option<String> {
        columns
            .iter()
            .find(|c| self.positions.contains_key(**c))
            .map(|c| c.to_string())
    }
}

/// Load the public-institutions snapshot.
///
/// Schema: id `NCESSCH`, name `SCH_NAME`, street `LSTREET1..3`, city
/// `LCITY`, state `LSTATE`, zip `LZIP`. The level column (one of `LEVEL`,
/// `SCH_LEVEL`, `SCHOOL_LEVEL`) filters to secondary schools: values
/// containing `3` are kept. Rows with missing fields load with empty
/// strings rather than failing the snapshot.
pub fn load_public_records(path: &Path, high_schools_only: bool) -> Result<Vec<ReferenceRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = HeaderMap::new(reader.headers()?);
    let level_column = headers.first_present(&["LEVEL", "SCH_LEVEL", "SCHOOL_LEVEL"]);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                warn!(%err, "Skipping malformed public registry row");
                continue;
            }
        };

        if high_schools_only {
            if let Some(level_column) = &level_column {
                if !headers.value(&row, level_column).contains('3') {
                    continue;
                }
            }
        }

        let street = ["LSTREET1", "LSTREET2", "LSTREET3"]
            .iter()
            .map(|col| headers.value(&row, col))
            .filter(|part| !part.is_empty())
            .join(" ");

        records.push(ReferenceRecord {
            registry_id: headers.value(&row, "NCESSCH").to_string(),
            official_name: headers.value(&row, "SCH_NAME").to_string(),
            street,
            city: headers.value(&row, "LCITY").to_string(),
            state: headers.value(&row, "LSTATE").to_string(),
            zip: headers.value(&row, "LZIP").to_string(),
            origin: RegistryOrigin::Public,
        });
    }

    Ok(records)
}

/// Load the private-institutions snapshot.
///
/// Schema: id `PPIN`, name `PINST`, street `PADDRS`, city `PCITY`, state
/// `PSTATE`, zip `PZIP`. The level column (one of `LEVEL`, `LEVEL12`,
/// `LEVEL_CODE`) filters to schools serving high-school grades: values
/// containing `3`, `4`, `HS` or `HIGH` (case-insensitive) are kept.
pub fn load_private_records(path: &Path, high_schools_only: bool) -> Result<Vec<ReferenceRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = HeaderMap::new(reader.headers()?);
    let level_column = headers.first_present(&["LEVEL", "LEVEL12", "LEVEL_CODE"]);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                warn!(%err, "Skipping malformed private registry row");
                continue;
            }
        };

        if high_schools_only {
            if let Some(level_column) = &level_column {
                let level = headers.value(&row, level_column).to_uppercase();
                let serves_high_school = level.contains('3')
                    || level.contains('4')
                    || level.contains("HS")
                    || level.contains("HIGH");
                if !serves_high_school {
                    continue;
                }
            }
        }

        records.push(ReferenceRecord {
            registry_id: headers.value(&row, "PPIN").to_string(),
            official_name: headers.value(&row, "PINST").to_string(),
            street: headers.value(&row, "PADDRS").to_string(),
            city: headers.value(&row, "PCITY").to_string(),
            state: headers.value(&row, "PSTATE").to_string(),
            zip: headers.value(&row, "PZIP").to_string(),
            origin: RegistryOrigin::Private,
        });
    }

    Ok(records)
}

/// Load whichever registry snapshots exist in `data_dir`, combining public
/// and private records. A missing source is a warning; both missing is a
/// `MissingInput` error, since there is nothing to match against. A snapshot
/// whose rows are all filtered out still counts as found: the caller
/// proceeds with zero matches.
pub fn load_registry(data_dir: &Path, high_schools_only: bool) -> Result<Vec<ReferenceRecord>> {
    let mut combined = Vec::new();
    let mut found_snapshot = false;

    match find_latest_public_file(data_dir) {
        Some(path) => {
            found_snapshot = true;
            let records = load_public_records(&path, high_schools_only)?;
            info!(count = records.len(), path = %path.display(), "Loaded public registry snapshot");
            combined.extend(records);
        }
        None => warn!(dir = %data_dir.display(), "No public registry snapshot found"),
    }

    match find_latest_private_file(data_dir) {
        Some(path) => {
            found_snapshot = true;
            let records = load_private_records(&path, high_schools_only)?;
            info!(count = records.len(), path = %path.display(), "Loaded private registry snapshot");
            combined.extend(records);
        }
        None => warn!(dir = %data_dir.display(), "No private registry snapshot found"),
    }

    if !found_snapshot {
        return Err(StandardizeError::MissingInput(format!(
            "no registry snapshot ({}*.csv or {}*.csv) in {}",
            PUBLIC_SNAPSHOT_PREFIX,
            PRIVATE_SNAPSHOT_PREFIX,
            data_dir.display()
        )));
    }

    Ok(combined)
}

/// Read distinct-school records (original_name, state, occurrence_count)
/// from a roster extract CSV.
pub fn load_school_records_csv(path: &Path) -> Result<Vec<RawSchoolRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

/// Read roster rows (original_name, state, city) from a CSV file.
pub fn load_roster_csv(path: &Path) -> Result<Vec<RosterRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Write a mapping table to CSV.
pub fn write_mapping_csv(path: &Path, mapping: &[CanonicalMapping]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for entry in mapping {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write batch registry-match output to CSV.
pub fn write_match_csv(path: &Path, rows: &[RegistryMatchRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a mapping table as pretty-printed JSON, for consumers that want
/// the optional columns as real nulls instead of empty CSV cells.
pub fn write_mapping_json(path: &Path, mapping: &[CanonicalMapping]) -> Result<()> {
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(file, mapping)?;
    Ok(())
}

/// Write batch registry-match output as pretty-printed JSON.
pub fn write_match_json(path: &Path, rows: &[RegistryMatchRow]) -> Result<()> {
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(file, rows)?;
    Ok(())
}
