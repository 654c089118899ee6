// Vehicle Config Audit - index, validate and edit BeamNG vehicle configurations
//
// This is the library crate containing the scanning, auditing and editing logic.
// The binary crate (main.rs) provides the command-line entry point.

pub mod catalog;
pub mod config;
pub mod container;
pub mod json;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;

// Re-export commonly used types for convenience
pub use crate::catalog::{Catalog, ConfigQuery, SortOrder};
pub use crate::config::ConfigManager;
pub use metrics::Metrics;
pub use models::{AppSettings, AuditOutcome, AuditResult, EditedFields, VehicleConfigRecord};
pub use services::{ConfigWriter, SaveError, SaveOutcome};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
