//! Path classification for vehicle info files.
//!
//! BeamNG lays out vehicle configurations as `vehicles/<model>/info_<config>.json`.
//! These helpers recognize such paths (loose filesystem paths and zip entry
//! names) and derive the `(model, config)` identity from them.
//!
//! # Examples
//!
//! ```
//! use vehicle_config_audit::services::classifier::extract_model_and_config;
//!
//! let keys = extract_model_and_config("vehicles/pickup/info_crew.json", true);
//! assert_eq!(keys, Some(("pickup".to_string(), "crew".to_string())));
//! ```

use regex::Regex;
use std::sync::LazyLock;

const INFO_PREFIX: &str = "info_";

/// Length stripped from the file stem to obtain the config key.
const INFO_PREFIX_LEN: usize = 5;

/// `vehicles` as a whole directory segment (filesystem paths, `/`-normalized)
static FOLDER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|/)vehicles/").expect("Invalid folder marker regex"));

/// `vehicles/` anywhere in an archive entry name
static ARCHIVE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)vehicles/").expect("Invalid archive marker regex"));

fn unify_separators(path: &str) -> String {
    path.replace('\\', "/")
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn ends_with_ignore_case(text: &str, suffix: &str) -> bool {
    text.len() >= suffix.len()
        && text
            .get(text.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}

/// File name without its last extension (`info_a.b.json` → `info_a.b`).
fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    }
}

/// True when a filesystem path has a `vehicles` directory segment and a file
/// name starting with `info_` (both case-insensitive).
pub fn is_vehicle_info_path(path: &str) -> bool {
    let unified = unify_separators(path);
    FOLDER_MARKER.is_match(&unified) && starts_with_ignore_case(file_name(&unified), INFO_PREFIX)
}

/// Archive entry rule: starts with `vehicles/`, file name starts with `info_`
/// and ends with `.json` (all case-insensitive).
pub fn is_vehicle_info_entry(entry_name: &str) -> bool {
    starts_with_ignore_case(entry_name, "vehicles/")
        && starts_with_ignore_case(file_name(entry_name), INFO_PREFIX)
        && ends_with_ignore_case(entry_name, ".json")
}

/// Derive `(model_key, config_key)` from an info file path.
///
/// The segment right after `vehicles` is the model; the file name with its
/// extension and first five characters removed is the config. Returns `None`
/// when there is no `vehicles` marker, fewer than two segments follow it, or
/// the file name does not start with `info_`.
pub fn extract_model_and_config(path: &str, is_archive: bool) -> Option<(String, String)> {
    let unified = unify_separators(path);
    let marker = if is_archive {
        &ARCHIVE_MARKER
    } else {
        &FOLDER_MARKER
    };

    let found = marker.find(&unified)?;
    let segments: Vec<&str> = unified[found.end()..]
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    if segments.len() < 2 {
        return None;
    }

    let model_key = segments[0];
    let file_name = segments[segments.len() - 1];
    if !starts_with_ignore_case(file_name, INFO_PREFIX) {
        return None;
    }

    let stem = file_stem(file_name);
    let config_key = if stem.len() > INFO_PREFIX_LEN {
        stem.get(INFO_PREFIX_LEN..).unwrap_or(stem)
    } else {
        stem
    };

    Some((model_key.to_string(), config_key.to_string()))
}
