use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use hs_standardize::error::Result;
use hs_standardize::{loader, mapping, registry::RegistryIndex};

#[derive(Parser)]
#[command(name = "hs-standardize")]
#[command(about = "Standardize high-school names from sports-roster data")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a standardization mapping from a distinct-schools CSV
    BuildMapping {
        /// CSV with original_name, state, occurrence_count columns
        schools: PathBuf,

        /// Output path for the mapping CSV
        #[arg(short, long, default_value = "mapping.csv")]
        out: PathBuf,

        /// Skip the curated prep-school overlay
        #[arg(long)]
        no_curated: bool,

        /// Detect duplicates across state lines instead of within each state
        #[arg(long)]
        no_state_grouping: bool,
    },

    /// Match roster rows against the external school registry
    MatchRegistry {
        /// CSV with original_name, state, city columns
        roster: PathBuf,

        /// Directory containing registry snapshot CSVs
        #[arg(short, long, default_value = "data/registry")]
        data_dir: PathBuf,

        /// Output path for the match results CSV
        #[arg(short, long, default_value = "matches.csv")]
        out: PathBuf,

        /// Keep registry entries of every school level, not just high schools
        #[arg(long)]
        all_levels: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    match args.command {
        Command::BuildMapping {
            schools,
            out,
            no_curated,
            no_state_grouping,
        } => {
            let records = loader::load_school_records_csv(&schools)?;
            info!(count = records.len(), "Loaded distinct school records");

            let mapping = mapping::build_complete_mapping(&records, !no_curated, !no_state_grouping);
            if wants_json(&out) {
                loader::write_mapping_json(&out, &mapping)?;
            } else {
                loader::write_mapping_csv(&out, &mapping)?;
            }
            info!(entries = mapping.len(), out = %out.display(), "Wrote mapping table");
        }

        Command::MatchRegistry {
            roster,
            data_dir,
            out,
            all_levels,
        } => {
            let rows = loader::load_roster_csv(&roster)?;
            info!(count = rows.len(), "Loaded roster rows");

            let reference = loader::load_registry(&data_dir, !all_levels)?;
            let index = RegistryIndex::build(reference);

            let matches = index.batch_match(&rows);
            if wants_json(&out) {
                loader::write_match_json(&out, &matches)?;
            } else {
                loader::write_match_csv(&out, &matches)?;
            }
            info!(rows = matches.len(), out = %out.display(), "Wrote match results");
        }
    }

    Ok(())
}

fn wants_json(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}
