//! Saving and reloading vehicle info files.
//!
//! Edits are merged into the record's own JSON object so keys the editor does
//! not know about survive untouched, then the object is written back through
//! the record's container. Folder mods overwrite the info file; zipped mods
//! get only the targeted entry replaced.

use crate::container::ContainerError;
use crate::json::{self, number_node, Node, NodeExt};
use crate::models::{EditedFields, ValidatedEdit, ValidationFailure, VehicleConfigRecord};
use crate::services::normalizer;
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::json;
use std::fs;
use thiserror::Error;

/// Errors that can occur while saving a record
#[derive(Error, Debug)]
pub enum SaveError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("Config {0} does not contain a JSON object")]
    NotAnObject(String),

    #[error("Failed to create backup {path}: {source}")]
    Backup {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write config: {0}")]
    Io(#[from] ContainerError),
}

/// Errors that can occur while reloading a record from disk
#[derive(Error, Debug)]
pub enum ReloadError {
    #[error("Failed to read config: {0}")]
    Container(#[from] ContainerError),

    #[error("Failed to parse JSON for {path}: {source}")]
    Parse {
        path: String,
        source: json::ParseError,
    },
}

/// What a successful save did besides writing the info file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOutcome {
    /// A `.bak` copy was made by this save
    pub backup_created: bool,
}

/// Writes edited records back into their mod package.
#[derive(Debug, Clone, Copy)]
pub struct ConfigWriter {
    backup: bool,
}

impl ConfigWriter {
    /// `backup` enables the one-time `.bak` copy before the first write.
    pub fn new(backup: bool) -> Self {
        Self { backup }
    }

    pub fn backup_enabled(&self) -> bool {
        self.backup
    }

    /// Validate, merge and persist an edit.
    ///
    /// On any failure the record keeps its previous JSON and fields.
    pub fn save(
        &self,
        record: &mut VehicleConfigRecord,
        edited: &EditedFields,
    ) -> Result<SaveOutcome, SaveError> {
        let edit = edited.validate()?;

        if !record.raw_json().is_object() {
            return Err(SaveError::NotAnObject(record.display_path()));
        }

        let mut merged = record.raw_json().clone();
        merge_edit(&mut merged, &edit);
        let text = json::serialize(&merged, true);

        let backup_created = self.backup && ensure_backup(&record.backing_file())?;

        record.container().write_text(record.entry_path(), &text)?;
        normalizer::apply(record, merged);

        tracing::info!("Saved {} ({})", record.config_key(), record.mod_name());
        Ok(SaveOutcome { backup_created })
    }

    /// Re-read a record's info file and replace its JSON and fields.
    pub fn reload(&self, record: &mut VehicleConfigRecord) -> Result<(), ReloadError> {
        reload(record)
    }
}

impl Default for ConfigWriter {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Set the edited keys on a JSON object, leaving every other key in place.
///
/// `Population` is removed when the edit carries none.
pub fn merge_edit(root: &mut Node, edit: &ValidatedEdit) {
    root.set_key("Brand", Node::from(edit.brand.as_str()));
    root.set_key("Country", Node::from(edit.country.as_str()));
    root.set_key("Type", Node::from(edit.vehicle_type.as_str()));
    root.set_key("Body Style", Node::from(edit.body_style.as_str()));
    root.set_key("Config Type", Node::from(edit.config_type.as_str()));
    root.set_key("Configuration", Node::from(edit.configuration.as_str()));
    root.set_key("Years", json!({"min": edit.year_min, "max": edit.year_max}));
    root.set_key("Value", number_node(edit.value));

    match edit.population {
        Some(population) => {
            root.set_key("Population", Node::from(population));
        }
        None => {
            root.remove_key("Population");
        }
    }
}

/// `<original>.bak`
pub fn backup_path(original: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{}.bak", original))
}

/// Copy `original` to `<original>.bak` unless that backup already exists.
///
/// Returns whether a backup was created by this call.
pub fn ensure_backup(original: &Utf8Path) -> Result<bool, SaveError> {
    let backup = backup_path(original);
    if backup.exists() {
        return Ok(false);
    }

    fs::copy(original, &backup).map_err(|source| SaveError::Backup {
        path: backup.clone(),
        source,
    })?;

    tracing::info!("Created backup {}", backup);
    Ok(true)
}

/// Re-read a record's info file and replace its JSON and fields.
pub fn reload(record: &mut VehicleConfigRecord) -> Result<(), ReloadError> {
    let text = record.container().read_text(record.entry_path())?;
    let root = json::parse(&text).map_err(|source| ReloadError::Parse {
        path: record.display_path(),
        source,
    })?;

    normalizer::apply(record, root);
    tracing::info!("Reloaded {} ({})", record.config_key(), record.mod_name());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit(population: Option<i32>) -> ValidatedEdit {
        ValidatedEdit {
            brand: "Gavril".to_string(),
            country: "United States".to_string(),
            vehicle_type: "Truck".to_string(),
            body_style: "Pickup".to_string(),
            config_type: "Factory".to_string(),
            configuration: "Base".to_string(),
            year_min: 1990,
            year_max: 1998,
            value: 12000.0,
            population,
        }
    }

    #[test]
    fn test_merge_keeps_unknown_keys_in_place() {
        let mut root = json!({
            "Name": "Pickup",
            "Brand": "Old",
            "slotType": "main",
            "Population": 5
        });
        merge_edit(&mut root, &edit(Some(700)));

        let keys: Vec<_> = root.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                "Name",
                "Brand",
                "slotType",
                "Population",
                "Country",
                "Type",
                "Body Style",
                "Config Type",
                "Configuration",
                "Years",
                "Value"
            ]
        );
        assert_eq!(root["Brand"], json!("Gavril"));
        assert_eq!(root["Years"], json!({"min": 1990, "max": 1998}));
        assert_eq!(root["Value"], json!(12000));
        assert_eq!(root["Population"], json!(700));
        assert_eq!(root["slotType"], json!("main"));
    }

    #[test]
    fn test_merge_removes_population_when_absent() {
        let mut root = json!({"Population": 5, "Name": "x"});
        merge_edit(&mut root, &edit(None));
        assert!(root.get_key("Population").is_none());
        assert_eq!(root["Name"], json!("x"));
    }

    #[test]
    fn test_merge_fractional_value() {
        let mut root = json!({});
        let mut fractional = edit(None);
        fractional.value = 999.5;
        merge_edit(&mut root, &fractional);
        assert_eq!(root["Value"], json!(999.5));
    }
}
