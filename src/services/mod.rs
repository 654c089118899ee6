//! Services module - the domain logic behind scanning, auditing and editing.
//!
//! Every service here is UI-agnostic: inputs are explicit parameters, outputs
//! are plain values, and nothing holds global state.
//!
//! # Components
//!
//! - [`classifier`]: recognizes `vehicles/<model>/info_<config>.json` paths
//! - [`normalizer`]: projects info JSON onto record fields, missing-field diagnosis
//! - [`scanner`]: walks a mods root (folders, `unpacked/`, zips) into records
//! - [`part_index`]: part name → value lookup from a model's `.jbeam` files
//! - [`auditor`]: joins a `.pc` parts manifest against the part index
//! - [`writer`]: merges edits into the info JSON and persists it, with backup
//! - [`autofill`]: fills blank form fields from configured defaults
//!
//! # Failure policy
//!
//! Batch operations (scan, index build) count and skip per-item failures.
//! Single-target operations (save, reload) return an error naming the path or
//! fields involved. The audit always returns an outcome, possibly a narrative.
//!
//! # Usage Example
//!
//! ```ignore
//! use vehicle_config_audit::services::{auditor, scanner, ConfigWriter};
//!
//! let outcome = scanner::scan(Utf8Path::new("mods"))?;
//! for record in &outcome.records {
//!     println!("{}: {}", record.config_key(), auditor::audit(record).describe());
//! }
//! ```

pub mod auditor;
pub mod autofill;
pub mod classifier;
pub mod normalizer;
pub mod part_index;
pub mod scanner;
pub mod writer;

pub use auditor::audit;
pub use part_index::{build_index, PartValueIndex};
pub use scanner::{scan, ScanError, ScanOutcome};
pub use writer::{ConfigWriter, ReloadError, SaveError, SaveOutcome};
