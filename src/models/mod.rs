//! Data models for vehicle configuration auditing.
//!
//! - [`ModUnit`]: one mod package (folder or zip) found during a scan
//! - [`VehicleConfigRecord`]: one `info_<config>.json`, its identity, projected fields and backing JSON
//! - [`MissingField`]: tags of the required-field diagnosis, in their fixed order
//! - [`EditedFields`] / [`ValidatedEdit`]: form text before and after validation
//! - [`AuditResult`] / [`AuditOutcome`]: parts audit output
//! - [`AppSettings`] / [`AutoFillSettings`]: user settings loaded from YAML
//! - [`PopulationPreset`]: named rarity levels for `Population`

pub mod audit;
pub mod record;
pub mod settings;

pub use audit::{AuditOutcome, AuditResult, PartValue, MISSING_SAMPLE_LIMIT, TOP_PARTS_LIMIT};
pub use record::{
    ConfigFields, EditedFields, MissingField, ModUnit, RecordIdentity, ValidatedEdit,
    ValidationFailure, VehicleConfigRecord,
};
pub use settings::{AppSettings, AutoFillSettings, PopulationPreset};
