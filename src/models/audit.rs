use std::fmt::Write;

/// Number of valued parts kept in [`AuditResult::top_parts`].
pub const TOP_PARTS_LIMIT: usize = 5;

/// Number of unvalued part names kept in [`AuditResult::missing_sample`].
pub const MISSING_SAMPLE_LIMIT: usize = 10;

/// A part name with its declared value.
#[derive(Debug, Clone, PartialEq)]
pub struct PartValue {
    pub name: String,
    pub value: f64,
}

/// Parts audit of one configuration. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuditResult {
    /// Named parts in the manifest, duplicates included
    pub parts_listed: usize,
    pub parts_valued: usize,
    pub parts_unvalued: usize,
    pub total_value: f64,
    /// Highest-valued parts, descending, ties in manifest order
    pub top_parts: Vec<PartValue>,
    /// First unvalued part names in manifest order
    pub missing_sample: Vec<String>,
    /// The configuration's own `Value`, for comparison
    pub config_value: Option<f64>,
}

impl AuditResult {
    /// Multi-line report, values rounded half away from zero.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Parts listed: {}", self.parts_listed);
        let _ = writeln!(out, "Parts with value: {}", self.parts_valued);
        let _ = writeln!(out, "Parts missing value: {}", self.parts_unvalued);
        let _ = writeln!(out, "Total parts value: {:.0}", self.total_value.round());
        if let Some(value) = self.config_value {
            let _ = writeln!(out, "Config Value: {:.0}", value.round());
        }

        if !self.top_parts.is_empty() {
            let _ = writeln!(out, "Top parts:");
            for part in &self.top_parts {
                let _ = writeln!(out, "- {}: {:.0}", part.name, part.value.round());
            }
        }

        if !self.missing_sample.is_empty() {
            let _ = writeln!(out, "Missing part values (sample):");
            for name in &self.missing_sample {
                let _ = writeln!(out, "- {}", name);
            }
        }

        out.trim_end().to_string()
    }
}

/// What an audit produced: a report, or an explanation of why none could be built.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditOutcome {
    Report(AuditResult),
    Narrative(String),
}

impl AuditOutcome {
    pub fn report(&self) -> Option<&AuditResult> {
        match self {
            AuditOutcome::Report(result) => Some(result),
            AuditOutcome::Narrative(_) => None,
        }
    }

    /// Text shown to the user for either variant.
    pub fn describe(&self) -> String {
        match self {
            AuditOutcome::Report(result) => result.summary(),
            AuditOutcome::Narrative(message) => message.clone(),
        }
    }
}
