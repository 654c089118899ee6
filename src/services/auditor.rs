//! Parts audit: join a configuration's `.pc` manifest against the model's part values.
//!
//! The audit never fails outright. Missing manifests, unparseable files and
//! empty part lists produce an [`AuditOutcome::Narrative`] explaining why no
//! report could be built.

use crate::container::Container;
use crate::json::{self, Node, NodeExt};
use crate::models::{
    AuditOutcome, AuditResult, PartValue, VehicleConfigRecord, MISSING_SAMPLE_LIMIT,
    TOP_PARTS_LIMIT,
};
use crate::services::part_index::{build_index_in, PartValueIndex};

/// Container-relative path of the record's parts manifest.
///
/// A non-blank `pcFilename` wins (one leading `/` removed); otherwise
/// `vehicles/<model>/<config>.pc`.
pub fn manifest_path(record: &VehicleConfigRecord) -> String {
    match record.raw_json().try_get_string("pcFilename") {
        Some(pc) if !pc.trim().is_empty() => pc.strip_prefix('/').unwrap_or(pc).to_string(),
        _ => format!("vehicles/{}/{}.pc", record.model_key(), record.config_key()),
    }
}

/// Named parts of a manifest root, in encounter order (duplicates kept).
///
/// `None` when the root has no `parts` object.
pub fn manifest_part_names(root: &Node) -> Option<Vec<String>> {
    let parts = root.get_key("parts")?.as_object()?;
    Some(
        parts
            .values()
            .filter_map(|slot| slot.as_str())
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Audit the parts of one configuration.
pub fn audit(record: &VehicleConfigRecord) -> AuditOutcome {
    let container = record.container();
    audit_in(record, container.as_ref())
}

pub fn audit_in(record: &VehicleConfigRecord, container: &dyn Container) -> AuditOutcome {
    let pc_path = manifest_path(record);

    let text = match container.read_text(&pc_path) {
        Ok(text) => text,
        Err(e) => {
            tracing::info!("Parts audit of {} stopped: {}", record.config_key(), e);
            return AuditOutcome::Narrative(format!("Failed to read pc file {}: {}", pc_path, e));
        }
    };

    let root = match json::parse(&text) {
        Ok(root) if root.is_object() => root,
        Ok(_) | Err(_) => return AuditOutcome::Narrative("Failed to parse pc file.".to_string()),
    };

    let Some(part_names) = manifest_part_names(&root) else {
        return AuditOutcome::Narrative("pc file has no parts list.".to_string());
    };

    if part_names.is_empty() {
        return AuditOutcome::Narrative("pc file has no named parts.".to_string());
    }

    let index = build_index_in(container, record.model_key());
    let mut result = summarize(&part_names, &index);
    result.config_value = record.fields.value;

    tracing::info!(
        "Audited {} ({}): {} parts, {} valued, total {:.0}",
        record.config_key(),
        record.mod_name(),
        result.parts_listed,
        result.parts_valued,
        result.total_value
    );
    AuditOutcome::Report(result)
}

/// Partition manifest parts by the index and aggregate the totals.
pub fn summarize(part_names: &[String], index: &PartValueIndex) -> AuditResult {
    let mut seen = std::collections::HashSet::new();
    let mut valued: Vec<PartValue> = Vec::new();
    let mut unvalued: Vec<String> = Vec::new();

    for name in part_names {
        if !seen.insert(name.as_str()) {
            continue;
        }
        match index.get(name) {
            Some(value) => valued.push(PartValue {
                name: name.clone(),
                value,
            }),
            None => unvalued.push(name.clone()),
        }
    }

    let total_value = valued.iter().map(|part| part.value).sum();

    let mut top_parts = valued.clone();
    top_parts.sort_by(|a, b| b.value.total_cmp(&a.value));
    top_parts.truncate(TOP_PARTS_LIMIT);

    AuditResult {
        parts_listed: part_names.len(),
        parts_valued: valued.len(),
        parts_unvalued: unvalued.len(),
        total_value,
        top_parts,
        missing_sample: unvalued.into_iter().take(MISSING_SAMPLE_LIMIT).collect(),
        config_value: None,
    }
}
