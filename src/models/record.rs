use crate::container::{self, Container};
use crate::json::Node;
use crate::models::PopulationPreset;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use thiserror::Error;

/// One mod package discovered during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModUnit {
    pub name: String,
    /// Folder path, or path of the zip file
    pub source_path: Utf8PathBuf,
    pub is_archive: bool,
}

impl ModUnit {
    pub fn folder<P: AsRef<Utf8Path>>(name: impl Into<String>, path: P) -> Self {
        Self {
            name: name.into(),
            source_path: path.as_ref().to_path_buf(),
            is_archive: false,
        }
    }

    pub fn archive<P: AsRef<Utf8Path>>(name: impl Into<String>, path: P) -> Self {
        Self {
            name: name.into(),
            source_path: path.as_ref().to_path_buf(),
            is_archive: true,
        }
    }

    pub fn container(&self) -> Box<dyn Container> {
        container::open(&self.source_path, self.is_archive)
    }
}

/// Identity of a record. Fixed once the record exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIdentity {
    pub mod_name: String,
    pub source_path: Utf8PathBuf,
    /// Container-relative, forward-slash path of the info file
    pub entry_path: String,
    pub is_archive: bool,
    pub model_key: String,
    pub config_key: String,
}

/// Semantic fields projected from an info file.
///
/// Every field may be absent independently; absence drives the missing-field
/// diagnosis and is never replaced by a default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFields {
    pub vehicle_name: String,
    pub brand: Option<String>,
    pub country: Option<String>,
    pub vehicle_type: Option<String>,
    pub body_style: Option<String>,
    pub config_type: Option<String>,
    pub configuration: Option<String>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub value: Option<f64>,
    pub population: Option<i32>,
}

fn is_blank(text: &Option<String>) -> bool {
    text.as_deref().is_none_or(|t| t.trim().is_empty())
}

impl ConfigFields {
    /// Required fields that are blank or unset, in the fixed check order.
    pub fn missing_fields(&self) -> Vec<MissingField> {
        let mut missing = Vec::new();
        if is_blank(&self.brand) {
            missing.push(MissingField::Brand);
        }
        if is_blank(&self.country) {
            missing.push(MissingField::Country);
        }
        if is_blank(&self.vehicle_type) {
            missing.push(MissingField::Type);
        }
        if is_blank(&self.body_style) {
            missing.push(MissingField::BodyStyle);
        }
        if is_blank(&self.config_type) {
            missing.push(MissingField::ConfigType);
        }
        if is_blank(&self.configuration) {
            missing.push(MissingField::Configuration);
        }
        if self.year_min.is_none() || self.year_max.is_none() {
            missing.push(MissingField::Years);
        }
        if self.value.is_none() {
            missing.push(MissingField::Value);
        }
        if self.population.is_none() {
            missing.push(MissingField::Population);
        }
        missing
    }
}

/// Tags reported by the missing-field diagnosis, in check order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissingField {
    Brand,
    Country,
    Type,
    BodyStyle,
    ConfigType,
    Configuration,
    /// Either year bound
    Years,
    Value,
    Population,
}

impl MissingField {
    pub const ALL: [MissingField; 9] = [
        MissingField::Brand,
        MissingField::Country,
        MissingField::Type,
        MissingField::BodyStyle,
        MissingField::ConfigType,
        MissingField::Configuration,
        MissingField::Years,
        MissingField::Value,
        MissingField::Population,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MissingField::Brand => "Brand",
            MissingField::Country => "Country",
            MissingField::Type => "Type",
            MissingField::BodyStyle => "Body Style",
            MissingField::ConfigType => "Config Type",
            MissingField::Configuration => "Configuration",
            MissingField::Years => "Years",
            MissingField::Value => "Value",
            MissingField::Population => "Population",
        }
    }
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One vehicle configuration discovered in a mod.
///
/// `raw_json` is the source of truth for serialization; [`ConfigFields`] is a
/// projection of it that is refreshed whenever the JSON changes.
#[derive(Debug, Clone)]
pub struct VehicleConfigRecord {
    identity: RecordIdentity,
    pub fields: ConfigFields,
    raw_json: Node,
}

impl VehicleConfigRecord {
    pub(crate) fn new(identity: RecordIdentity, fields: ConfigFields, raw_json: Node) -> Self {
        Self {
            identity,
            fields,
            raw_json,
        }
    }

    pub fn identity(&self) -> &RecordIdentity {
        &self.identity
    }

    pub fn mod_name(&self) -> &str {
        &self.identity.mod_name
    }

    pub fn source_path(&self) -> &Utf8Path {
        &self.identity.source_path
    }

    pub fn entry_path(&self) -> &str {
        &self.identity.entry_path
    }

    pub fn is_archive(&self) -> bool {
        self.identity.is_archive
    }

    pub fn model_key(&self) -> &str {
        &self.identity.model_key
    }

    pub fn config_key(&self) -> &str {
        &self.identity.config_key
    }

    pub fn raw_json(&self) -> &Node {
        &self.raw_json
    }

    /// Swap in a new JSON root together with its projection.
    pub(crate) fn replace_json(&mut self, raw_json: Node, fields: ConfigFields) {
        self.raw_json = raw_json;
        self.fields = fields;
    }

    pub fn missing_fields(&self) -> Vec<MissingField> {
        self.fields.missing_fields()
    }

    /// The package this record lives in.
    pub fn unit(&self) -> ModUnit {
        ModUnit {
            name: self.identity.mod_name.clone(),
            source_path: self.identity.source_path.clone(),
            is_archive: self.identity.is_archive,
        }
    }

    pub fn container(&self) -> Box<dyn Container> {
        container::open(&self.identity.source_path, self.identity.is_archive)
    }

    /// Filesystem path of the info file (folder units) or of the archive.
    pub fn backing_file(&self) -> Utf8PathBuf {
        if self.identity.is_archive {
            self.identity.source_path.clone()
        } else {
            self.identity
                .entry_path
                .split('/')
                .fold(self.identity.source_path.clone(), |path, segment| {
                    path.join(segment)
                })
        }
    }

    /// Human-readable location, `archive :: entry` for zipped mods.
    pub fn display_path(&self) -> String {
        if self.identity.is_archive {
            format!("{} :: {}", self.identity.source_path, self.identity.entry_path)
        } else {
            self.backing_file().to_string()
        }
    }
}

/// Raw text of the editable fields, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditedFields {
    pub brand: String,
    pub country: String,
    pub vehicle_type: String,
    pub body_style: String,
    pub config_type: String,
    pub configuration: String,
    pub year_min: String,
    pub year_max: String,
    pub value: String,
    pub population: String,
}

/// Edited fields that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEdit {
    pub brand: String,
    pub country: String,
    pub vehicle_type: String,
    pub body_style: String,
    pub config_type: String,
    pub configuration: String,
    pub year_min: i32,
    pub year_max: i32,
    pub value: f64,
    /// `None` removes `Population` from the file
    pub population: Option<i32>,
}

/// User-entered fields that failed type or range checks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Fix the following fields:\n- {}", .fields.join("\n- "))]
pub struct ValidationFailure {
    pub fields: Vec<String>,
}

fn parse_int(text: &str) -> Option<i32> {
    text.trim().parse::<i32>().ok()
}

fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl EditedFields {
    /// Pre-fill the form from a record's current fields.
    pub fn from_record(record: &VehicleConfigRecord) -> Self {
        let fields = &record.fields;
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        let number = |value: Option<i32>| value.map(|v| v.to_string()).unwrap_or_default();

        Self {
            brand: text(&fields.brand),
            country: text(&fields.country),
            vehicle_type: text(&fields.vehicle_type),
            body_style: text(&fields.body_style),
            config_type: text(&fields.config_type),
            configuration: text(&fields.configuration),
            year_min: number(fields.year_min),
            year_max: number(fields.year_max),
            value: fields.value.map(|v| v.to_string()).unwrap_or_default(),
            population: number(fields.population),
        }
    }

    /// Set a field by its form label (`Brand`, `Body Style`, `Year Min`, ...).
    ///
    /// Returns `false` for unknown labels.
    pub fn set_by_label(&mut self, label: &str, value: impl Into<String>) -> bool {
        let slot = match label.trim().to_ascii_lowercase().as_str() {
            "brand" => &mut self.brand,
            "country" => &mut self.country,
            "type" => &mut self.vehicle_type,
            "body style" | "body_style" => &mut self.body_style,
            "config type" | "config_type" => &mut self.config_type,
            "configuration" => &mut self.configuration,
            "year min" | "year_min" => &mut self.year_min,
            "year max" | "year_max" => &mut self.year_max,
            "value" => &mut self.value,
            "population" => &mut self.population,
            _ => return false,
        };
        *slot = value.into();
        true
    }

    pub fn set_population_preset(&mut self, preset: PopulationPreset) {
        self.population = preset.value().to_string();
    }

    /// Missing tags computed from the form text rather than a record.
    pub fn missing_fields(&self) -> Vec<MissingField> {
        let blank = |s: &str| s.trim().is_empty();
        let mut missing = Vec::new();
        if blank(&self.brand) {
            missing.push(MissingField::Brand);
        }
        if blank(&self.country) {
            missing.push(MissingField::Country);
        }
        if blank(&self.vehicle_type) {
            missing.push(MissingField::Type);
        }
        if blank(&self.body_style) {
            missing.push(MissingField::BodyStyle);
        }
        if blank(&self.config_type) {
            missing.push(MissingField::ConfigType);
        }
        if blank(&self.configuration) {
            missing.push(MissingField::Configuration);
        }
        if parse_int(&self.year_min).is_none() || parse_int(&self.year_max).is_none() {
            missing.push(MissingField::Years);
        }
        if parse_float(&self.value).is_none() {
            missing.push(MissingField::Value);
        }
        if parse_int(&self.population).is_none() {
            missing.push(MissingField::Population);
        }
        missing
    }

    /// Check types and ranges. Population is optional: text that is not an
    /// integer means "no population".
    pub fn validate(&self) -> Result<ValidatedEdit, ValidationFailure> {
        let mut errors = Vec::new();

        let required = [
            ("Brand", &self.brand),
            ("Country", &self.country),
            ("Type", &self.vehicle_type),
            ("Body Style", &self.body_style),
            ("Config Type", &self.config_type),
            ("Configuration", &self.configuration),
        ];
        for (label, value) in required {
            if value.trim().is_empty() {
                errors.push(label.to_string());
            }
        }

        let year_min = parse_int(&self.year_min);
        if year_min.is_none() {
            errors.push("Year Min".to_string());
        }
        let year_max = parse_int(&self.year_max);
        if year_max.is_none() {
            errors.push("Year Max".to_string());
        }

        if errors.is_empty() && year_min > year_max {
            errors.push("Year Min must be <= Year Max".to_string());
        }

        let value = parse_float(&self.value);
        if value.is_none() {
            errors.push("Value".to_string());
        }

        match (year_min, year_max, value) {
            (Some(year_min), Some(year_max), Some(value)) if errors.is_empty() => {
                Ok(ValidatedEdit {
                    brand: self.brand.trim().to_string(),
                    country: self.country.trim().to_string(),
                    vehicle_type: self.vehicle_type.trim().to_string(),
                    body_style: self.body_style.trim().to_string(),
                    config_type: self.config_type.trim().to_string(),
                    configuration: self.configuration.trim().to_string(),
                    year_min,
                    year_max,
                    value,
                    population: parse_int(&self.population),
                })
            }
            _ => Err(ValidationFailure { fields: errors }),
        }
    }
}
