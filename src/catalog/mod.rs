// Catalog module
//
// The session-owned list of records from the last scan, plus the filter and
// sort queries a presentation layer calls on demand.

use crate::models::VehicleConfigRecord;
use crate::services::scanner::{self, ScanError, ScanOutcome};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use std::cmp::Ordering;

/// Records from one scan, in enumeration order.
///
/// A new scan replaces the catalog wholesale; nothing carries over.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    root: Option<Utf8PathBuf>,
    records: Vec<VehicleConfigRecord>,
    errors: usize,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `root` and build a fresh catalog.
    pub fn load(root: &Utf8Path) -> Result<Self, ScanError> {
        let outcome = scanner::scan(root)?;
        Ok(Self::from_outcome(root, outcome))
    }

    pub fn from_outcome(root: &Utf8Path, outcome: ScanOutcome) -> Self {
        Self {
            root: Some(root.to_path_buf()),
            records: outcome.records,
            errors: outcome.errors,
        }
    }

    pub fn root(&self) -> Option<&Utf8Path> {
        self.root.as_deref()
    }

    pub fn records(&self) -> &[VehicleConfigRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Items skipped during the scan
    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// Status text shown after a scan.
    pub fn status(&self) -> String {
        format!("Loaded {} configs. Errors: {}.", self.records.len(), self.errors)
    }

    /// Locate a record by mod name and config key (case-insensitive).
    pub fn find(&self, mod_name: &str, config_key: &str) -> Option<&VehicleConfigRecord> {
        self.records
            .iter()
            .find(|r| is_same_record(r, mod_name, config_key))
    }

    pub fn find_mut(&mut self, mod_name: &str, config_key: &str) -> Option<&mut VehicleConfigRecord> {
        self.records
            .iter_mut()
            .find(|r| is_same_record(r, mod_name, config_key))
    }

    /// Records passing `query`, ordered by `order`.
    pub fn view(&self, query: &ConfigQuery, order: SortOrder) -> Vec<&VehicleConfigRecord> {
        let mut matched: Vec<&VehicleConfigRecord> =
            self.records.iter().filter(|r| query.matches(r)).collect();
        matched.sort_by(|a, b| order.compare(a, b));
        matched
    }

    /// Records grouped by mod name, groups in first-seen order.
    pub fn group_by_mod(&self) -> IndexMap<&str, Vec<&VehicleConfigRecord>> {
        let mut groups: IndexMap<&str, Vec<&VehicleConfigRecord>> = IndexMap::new();
        for record in &self.records {
            groups.entry(record.mod_name()).or_default().push(record);
        }
        groups
    }

    /// Records passing `query`, grouped by mod in first-seen order, each group
    /// ordered by `order`. Mods with no matching record are left out.
    pub fn grouped_view(
        &self,
        query: &ConfigQuery,
        order: SortOrder,
    ) -> IndexMap<&str, Vec<&VehicleConfigRecord>> {
        let mut groups = self.group_by_mod();
        groups.retain(|_, records| {
            records.retain(|r| query.matches(r));
            records.sort_by(|a, b| order.compare(a, b));
            !records.is_empty()
        });
        groups
    }

    pub fn missing_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| !r.missing_fields().is_empty())
            .count()
    }
}

fn is_same_record(record: &VehicleConfigRecord, mod_name: &str, config_key: &str) -> bool {
    record.mod_name().eq_ignore_ascii_case(mod_name)
        && record.config_key().eq_ignore_ascii_case(config_key)
}

/// Filter predicate over catalog records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigQuery {
    /// Case-insensitive substring of mod name, model key, config key or vehicle name
    pub text: String,
    /// Keep only records with at least one missing field
    pub missing_only: bool,
}

impl ConfigQuery {
    pub fn matches(&self, record: &VehicleConfigRecord) -> bool {
        if self.missing_only && record.missing_fields().is_empty() {
            return false;
        }

        let needle = self.text.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [
            record.mod_name(),
            record.model_key(),
            record.config_key(),
            record.fields.vehicle_name.as_str(),
        ]
        .iter()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
    }
}

/// Sort comparator: optionally incomplete records first, then vehicle name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOrder {
    pub missing_first: bool,
}

impl SortOrder {
    pub fn compare(&self, a: &VehicleConfigRecord, b: &VehicleConfigRecord) -> Ordering {
        let by_missing = if self.missing_first {
            let a_missing = !a.missing_fields().is_empty();
            let b_missing = !b.missing_fields().is_empty();
            b_missing.cmp(&a_missing)
        } else {
            Ordering::Equal
        };

        by_missing.then_with(|| name_key(a).cmp(&name_key(b)))
    }
}

/// Blank names sort after every named record.
fn name_key(record: &VehicleConfigRecord) -> (bool, String) {
    let name = record.fields.vehicle_name.trim();
    (name.is_empty(), name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordIdentity;
    use crate::services::normalizer::create_record;
    use serde_json::json;

    fn record(mod_name: &str, config: &str, json: serde_json::Value) -> VehicleConfigRecord {
        create_record(
            RecordIdentity {
                mod_name: mod_name.to_string(),
                source_path: Utf8PathBuf::from(format!("/mods/{}", mod_name)),
                entry_path: format!("vehicles/pickup/info_{}.json", config),
                is_archive: false,
                model_key: "pickup".to_string(),
                config_key: config.to_string(),
            },
            json,
        )
    }

    fn complete(name: &str) -> serde_json::Value {
        json!({
            "Name": name, "Brand": "B", "Country": "C", "Type": "T", "Body Style": "S",
            "Config Type": "F", "Configuration": "X", "Years": {"min": 1, "max": 2},
            "Value": 1, "Population": 1
        })
    }

    fn sample_catalog() -> Catalog {
        Catalog::from_outcome(
            Utf8Path::new("/mods"),
            ScanOutcome {
                records: vec![
                    record("trucks", "base", complete("Zeta")),
                    record("cars", "sport", json!({"Name": "alpha"})),
                    record("trucks", "crew", complete("Mid")),
                ],
                errors: 2,
            },
        )
    }

    #[test]
    fn test_status_and_counts() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.missing_count(), 1);
        assert_eq!(catalog.status(), "Loaded 3 configs. Errors: 2.");
    }

    #[test]
    fn test_query_text_and_missing_only() {
        let catalog = sample_catalog();
        let query = ConfigQuery {
            text: "TRUCK".to_string(),
            missing_only: false,
        };
        assert_eq!(catalog.view(&query, SortOrder::default()).len(), 2);

        let query = ConfigQuery {
            text: String::new(),
            missing_only: true,
        };
        let view = catalog.view(&query, SortOrder::default());
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].config_key(), "sport");
    }

    #[test]
    fn test_sort_by_name_and_missing_first() {
        let catalog = sample_catalog();
        let names = |order: SortOrder| -> Vec<String> {
            catalog
                .view(&ConfigQuery::default(), order)
                .iter()
                .map(|r| r.fields.vehicle_name.clone())
                .collect()
        };

        assert_eq!(names(SortOrder { missing_first: false }), vec!["alpha", "Mid", "Zeta"]);

        let catalog = Catalog::from_outcome(
            Utf8Path::new("/mods"),
            ScanOutcome {
                records: vec![
                    record("a", "one", complete("Alpha")),
                    record("a", "two", json!({"Name": "Zulu"})),
                ],
                errors: 0,
            },
        );
        let view = catalog.view(&ConfigQuery::default(), SortOrder { missing_first: true });
        assert_eq!(view[0].fields.vehicle_name, "Zulu");
    }

    #[test]
    fn test_group_by_mod_keeps_first_seen_order() {
        let catalog = sample_catalog();
        let groups = catalog.group_by_mod();
        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(keys, vec!["trucks", "cars"]);
        assert_eq!(groups["trucks"].len(), 2);
    }

    #[test]
    fn test_grouped_view_sorts_within_groups() {
        let catalog = Catalog::from_outcome(
            Utf8Path::new("/mods"),
            ScanOutcome {
                records: vec![
                    record("trucks", "base", complete("Zeta")),
                    record("cars", "sport", json!({"Name": "alpha"})),
                    record("trucks", "crew", complete("Mid")),
                    record("trucks", "stub", json!({"Name": "Yank"})),
                ],
                errors: 0,
            },
        );
        let names = |groups: IndexMap<&str, Vec<&VehicleConfigRecord>>| -> Vec<(String, Vec<String>)> {
            groups
                .into_iter()
                .map(|(mod_name, records)| {
                    (
                        mod_name.to_string(),
                        records.iter().map(|r| r.fields.vehicle_name.clone()).collect(),
                    )
                })
                .collect()
        };

        let by_name = catalog.grouped_view(&ConfigQuery::default(), SortOrder::default());
        assert_eq!(
            names(by_name),
            vec![
                ("trucks".to_string(), vec!["Mid".to_string(), "Yank".to_string(), "Zeta".to_string()]),
                ("cars".to_string(), vec!["alpha".to_string()]),
            ]
        );

        let missing_first = catalog.grouped_view(&ConfigQuery::default(), SortOrder { missing_first: true });
        assert_eq!(
            names(missing_first)[0].1,
            vec!["Yank".to_string(), "Mid".to_string(), "Zeta".to_string()]
        );

        let query = ConfigQuery {
            text: "alpha".to_string(),
            missing_only: false,
        };
        let filtered = catalog.grouped_view(&query, SortOrder::default());
        assert_eq!(filtered.keys().copied().collect::<Vec<_>>(), vec!["cars"]);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let mut catalog = sample_catalog();
        assert!(catalog.find("TRUCKS", "Crew").is_some());
        assert!(catalog.find("trucks", "sport").is_none());
        catalog.find_mut("cars", "sport").unwrap().fields.brand = Some("Ibishu".to_string());
        assert_eq!(
            catalog.find("cars", "sport").unwrap().fields.brand.as_deref(),
            Some("Ibishu")
        );
    }
}
