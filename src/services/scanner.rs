//! Mod folder scanning.
//!
//! A mods root holds three kinds of packages:
//! - `<root>/<mod>/` plain folders (except one named `unpacked`)
//! - `<root>/unpacked/<mod>/` folders
//! - `<root>/<mod>.zip` archives
//!
//! Each package is searched for `vehicles/<model>/info_<config>.json` files.
//! A file that cannot be read, classified or parsed is counted and skipped; it
//! never aborts the scan.

use crate::container::{Container, ContainerError};
use crate::json;
use crate::models::{ModUnit, RecordIdentity, VehicleConfigRecord};
use crate::services::classifier::{
    extract_model_and_config, is_vehicle_info_entry, is_vehicle_info_path,
};
use crate::services::normalizer;
use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const UNPACKED_DIR: &str = "unpacked";
const INFO_PATTERN: &str = "info_*.json";

/// Errors that stop a scan before any package is read
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Mods folder not found: {0}")]
    RootNotFound(String),
}

/// Records found by a scan and the number of skipped items.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub records: Vec<VehicleConfigRecord>,
    pub errors: usize,
}

/// Scan a mods root and build the catalog in enumeration order.
pub fn scan(root: &Utf8Path) -> Result<ScanOutcome, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootNotFound(root.to_string()));
    }

    let discovery = discover_units(root);
    let mut outcome = ScanOutcome {
        errors: discovery.skipped,
        ..ScanOutcome::default()
    };
    for unit in &discovery.units {
        let before = outcome.records.len();
        let errors_before = outcome.errors;
        scan_unit(unit, &mut outcome);
        tracing::debug!(
            "Scanned {} ({}): {} configs, {} errors",
            unit.name,
            if unit.is_archive { "zip" } else { "folder" },
            outcome.records.len() - before,
            outcome.errors - errors_before
        );
    }

    tracing::info!(
        "Loaded {} configs. Errors: {}.",
        outcome.records.len(),
        outcome.errors
    );
    Ok(outcome)
}

/// Packages found under a mods root, plus root entries that could not be read.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub units: Vec<ModUnit>,
    pub skipped: usize,
}

/// Enumerate the mod packages under a root: folders, `unpacked` folders, then zips.
///
/// Symlinked folders and archives are followed. Broken links count as skipped.
pub fn discover_units(root: &Utf8Path) -> Discovery {
    let mut discovery = Discovery::default();

    let dirs = child_dirs(root, &mut discovery.skipped);
    discovery.units.extend(
        dirs.into_iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case(UNPACKED_DIR))
            .map(|(name, path)| ModUnit::folder(name, path)),
    );

    let unpacked = root.join(UNPACKED_DIR);
    if unpacked.is_dir() {
        let dirs = child_dirs(&unpacked, &mut discovery.skipped);
        discovery
            .units
            .extend(dirs.into_iter().map(|(name, path)| ModUnit::folder(name, path)));
    }

    let files = child_files(root, &mut discovery.skipped);
    discovery
        .units
        .extend(files.into_iter().filter_map(|(name, path)| {
            let stem = name
                .len()
                .checked_sub(4)
                .filter(|&cut| name.get(cut..).is_some_and(|ext| ext.eq_ignore_ascii_case(".zip")))
                .and_then(|cut| name.get(..cut))?;
            Some(ModUnit::archive(stem, path))
        }));

    discovery
}

/// Scan one package, appending its records and counting its failures.
pub fn scan_unit(unit: &ModUnit, outcome: &mut ScanOutcome) {
    let container = unit.container();
    let (pattern, is_info): (&str, fn(&str) -> bool) = if unit.is_archive {
        ("*", is_vehicle_info_entry)
    } else {
        (INFO_PATTERN, is_vehicle_info_path)
    };

    let listing = match container.list(pattern, true) {
        Ok(listing) => listing,
        Err(e) => {
            tracing::warn!("Failed to read mod {}: {}", unit.name, e);
            outcome.errors += 1;
            return;
        }
    };
    if listing.skipped > 0 {
        tracing::debug!("{} unreadable entries in {}", listing.skipped, unit.name);
        outcome.errors += listing.skipped;
    }

    let entries: Vec<String> = listing
        .entries
        .into_iter()
        .filter(|entry| is_info(entry))
        .collect();

    let texts = match container.read_texts(&entries) {
        Ok(texts) => texts,
        Err(e) => {
            tracing::warn!("Failed to read mod {}: {}", unit.name, e);
            outcome.errors += 1;
            return;
        }
    };

    for (entry, text) in entries.iter().zip(texts) {
        let loaded = text
            .map_err(SkipReason::from)
            .and_then(|text| load_record(unit, entry, &text));
        match loaded {
            Ok(record) => outcome.records.push(record),
            Err(reason) => {
                tracing::debug!("Skipping {} in {}: {}", entry, unit.name, reason);
                outcome.errors += 1;
            }
        }
    }
}

/// Why an info file was left out of the catalog
#[derive(Error, Debug)]
pub enum SkipReason {
    #[error("path does not name a vehicle configuration")]
    Unclassified,

    #[error(transparent)]
    Read(#[from] ContainerError),

    #[error(transparent)]
    Parse(#[from] json::ParseError),
}

/// Classify and normalize one info entry of a package from its text.
pub fn load_record(
    unit: &ModUnit,
    entry: &str,
    text: &str,
) -> Result<VehicleConfigRecord, SkipReason> {
    let (model_key, config_key) =
        extract_model_and_config(entry, unit.is_archive).ok_or(SkipReason::Unclassified)?;

    let root = json::parse(text)?;

    let identity = RecordIdentity {
        mod_name: unit.name.clone(),
        source_path: unit.source_path.clone(),
        entry_path: entry.to_string(),
        is_archive: unit.is_archive,
        model_key,
        config_key,
    };

    Ok(normalizer::create_record(identity, root))
}

fn child_entries(dir: &Utf8Path, want_dirs: bool, skipped: &mut usize) -> Vec<(String, Utf8PathBuf)> {
    let mut found = Vec::new();
    for item in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry under {}: {}", dir, e);
                // The root is walked once for dirs and once for files; count each failure once
                if e.path().is_some_and(|p| p.is_dir() == want_dirs) {
                    *skipped += 1;
                }
                continue;
            }
        };

        let file_type = item.file_type();
        let wanted = if want_dirs {
            file_type.is_dir()
        } else {
            file_type.is_file()
        };
        if !wanted {
            continue;
        }

        match Utf8PathBuf::from_path_buf(item.into_path()) {
            Ok(path) => {
                if let Some(name) = path.file_name().map(str::to_string) {
                    found.push((name, path));
                }
            }
            Err(path) => {
                let is_zip = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
                if want_dirs || is_zip {
                    tracing::debug!("Skipping non-UTF-8 path {}", path.display());
                    *skipped += 1;
                }
            }
        }
    }
    found
}

fn child_dirs(dir: &Utf8Path, skipped: &mut usize) -> Vec<(String, Utf8PathBuf)> {
    child_entries(dir, true, skipped)
}

fn child_files(dir: &Utf8Path, skipped: &mut usize) -> Vec<(String, Utf8PathBuf)> {
    child_entries(dir, false, skipped)
}
