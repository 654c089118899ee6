//! Part value index built from a model's `.jbeam` files.
//!
//! A jbeam file maps part names to part definitions; a definition may carry an
//! economic value at `information.value`. The index maps part names
//! (case-insensitive) to those values for one vehicle model.

use crate::container::Container;
use crate::json::{self, Node, NodeExt};
use crate::models::ModUnit;
use std::collections::HashMap;

const JBEAM_PATTERN: &str = "*.jbeam";

/// Case-insensitive part name → value lookup for one model namespace.
#[derive(Debug, Clone, Default)]
pub struct PartValueIndex {
    values: HashMap<String, f64>,
    files_indexed: usize,
    files_skipped: usize,
}

impl PartValueIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value unless the name is already present (first occurrence wins).
    pub fn insert_first(&mut self, name: &str, value: f64) -> bool {
        let key = name.to_lowercase();
        if self.values.contains_key(&key) {
            return false;
        }
        self.values.insert(key, value);
        true
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(&name.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn files_indexed(&self) -> usize {
        self.files_indexed
    }

    pub fn files_skipped(&self) -> usize {
        self.files_skipped
    }

    /// Add every valued part of a parsed jbeam document.
    pub fn add_jbeam(&mut self, root: &Node) {
        let Some(parts) = root.as_object() else {
            return;
        };

        for (name, part) in parts {
            let Some(value) = part
                .get_key("information")
                .filter(|info| info.is_object())
                .and_then(|info| info.try_get_f64("value"))
            else {
                continue;
            };
            self.insert_first(name, value);
        }
    }
}

/// Build the index for `model_key` inside a mod package.
///
/// Every `.jbeam` below `vehicles/<model_key>/` is read. Unreadable or
/// malformed files are skipped; the index is always returned.
pub fn build_index(unit: &ModUnit, model_key: &str) -> PartValueIndex {
    let container = unit.container();
    build_index_in(container.as_ref(), model_key)
}

pub fn build_index_in(container: &dyn Container, model_key: &str) -> PartValueIndex {
    let mut index = PartValueIndex::new();
    let prefix = format!("vehicles/{}/", model_key).to_lowercase();

    let listing = match container.list(JBEAM_PATTERN, true) {
        Ok(listing) => listing,
        Err(e) => {
            tracing::debug!("No part files for {} in {}: {}", model_key, container.location(), e);
            return index;
        }
    };
    index.files_skipped += listing.skipped;

    let entries: Vec<String> = listing
        .entries
        .into_iter()
        .filter(|entry| entry.to_lowercase().starts_with(&prefix))
        .collect();

    let texts = match container.read_texts(&entries) {
        Ok(texts) => texts,
        Err(e) => {
            tracing::debug!("Part files unreadable in {}: {}", container.location(), e);
            index.files_skipped += entries.len();
            return index;
        }
    };

    for (entry, text) in entries.iter().zip(texts) {
        let parsed = text
            .map_err(|e| e.to_string())
            .and_then(|text| json::parse(&text).map_err(|e| e.to_string()));

        match parsed {
            Ok(root) => {
                index.add_jbeam(&root);
                index.files_indexed += 1;
            }
            Err(reason) => {
                tracing::debug!("Ignoring malformed part file {}: {}", entry, reason);
                index.files_skipped += 1;
            }
        }
    }

    tracing::debug!(
        "Indexed {} part values for {} from {} files ({} skipped)",
        index.len(),
        model_key,
        index.files_indexed,
        index.files_skipped
    );
    index
}
