//! Projection of raw info-file JSON onto [`ConfigFields`].
//!
//! Categorical fields may be stored directly (`"Brand": "Gavril"`) or only as
//! an aggregate of boolean flags (`"aggregates": {"Brand": {"Gavril": true}}`).
//! Direct values win; the aggregate is the fallback.

use crate::json::{node_as_i32, Node, NodeExt};
use crate::models::{ConfigFields, MissingField, RecordIdentity, VehicleConfigRecord};

const AGGREGATES: &str = "aggregates";

/// Derive the semantic fields of a configuration from its JSON root.
pub fn normalize(root: &Node, config_key: &str) -> ConfigFields {
    let vehicle_name = root
        .try_get_string("Name")
        .or_else(|| root.try_get_string("Configuration"))
        .unwrap_or(config_key)
        .to_string();

    let (year_min, year_max) = read_years(root);

    ConfigFields {
        vehicle_name,
        brand: read_string_or_aggregate(root, "Brand"),
        country: read_string_or_aggregate(root, "Country"),
        vehicle_type: read_string_or_aggregate(root, "Type"),
        body_style: read_string_or_aggregate(root, "Body Style"),
        config_type: read_string_or_aggregate(root, "Config Type"),
        configuration: root.try_get_string("Configuration").map(str::to_string),
        year_min,
        year_max,
        value: root.try_get_f64("Value"),
        population: root.try_get_i32("Population"),
    }
}

/// Build a record from its identity and parsed JSON.
pub fn create_record(identity: RecordIdentity, root: Node) -> VehicleConfigRecord {
    let fields = normalize(&root, &identity.config_key);
    VehicleConfigRecord::new(identity, fields, root)
}

/// Re-project a record's fields from a new JSON root.
pub fn apply(record: &mut VehicleConfigRecord, root: Node) {
    let fields = normalize(&root, record.config_key());
    record.replace_json(root, fields);
}

/// Required fields that are blank or unset, in the fixed check order.
pub fn missing_fields(record: &VehicleConfigRecord) -> Vec<MissingField> {
    record.missing_fields()
}

/// Missing tags joined with `", "`; empty when the record is complete.
pub fn missing_summary(record: &VehicleConfigRecord) -> String {
    record
        .missing_fields()
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn has_missing(record: &VehicleConfigRecord) -> bool {
    !record.missing_fields().is_empty()
}

pub fn has_missing_population(record: &VehicleConfigRecord) -> bool {
    record.fields.population.is_none()
}

/// One-line status: `Missing: OK  •  Population: 1000  •  Value: 5000`.
pub fn status_line(record: &VehicleConfigRecord) -> String {
    let missing = record.missing_fields();
    let missing_text = if missing.is_empty() {
        "OK".to_string()
    } else {
        format!("{} missing", missing.len())
    };
    let population_text = record
        .fields
        .population
        .map(|p| p.to_string())
        .unwrap_or_else(|| "Missing".to_string());
    let value_text = record
        .fields
        .value
        .map(|v| format!("{:.0}", v.round()))
        .unwrap_or_else(|| "Missing".to_string());

    format!(
        "Missing: {}  •  Population: {}  •  Value: {}",
        missing_text, population_text, value_text
    )
}

/// Direct string when non-blank, else the `true` flags under `aggregates.<key>`
/// joined with `", "` in key order.
fn read_string_or_aggregate(root: &Node, key: &str) -> Option<String> {
    if let Some(direct) = root.try_get_string(key) {
        if !direct.trim().is_empty() {
            return Some(direct.to_string());
        }
    }

    let flags = root.get_path(&[AGGREGATES, key])?.as_object()?;
    let selected: Vec<&str> = flags
        .iter()
        .filter(|(_, flag)| flag.as_bool() == Some(true))
        .map(|(name, _)| name.as_str())
        .collect();

    (!selected.is_empty()).then(|| selected.join(", "))
}

/// `Years.min/max`, falling back to `aggregates.Years` when there is no
/// top-level `Years` object.
fn read_years(root: &Node) -> (Option<i32>, Option<i32>) {
    let years = root
        .get_key("Years")
        .filter(|node| node.is_object())
        .or_else(|| root.get_path(&[AGGREGATES, "Years"]).filter(|node| node.is_object()));

    match years {
        Some(years) => (
            years.get_key("min").and_then(node_as_i32),
            years.get_key("max").and_then(node_as_i32),
        ),
        None => (None, None),
    }
}
