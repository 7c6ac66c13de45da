use std::collections::BTreeMap;
use std::fmt;

use feastgen_core::EntityCounts;
use feastgen_generate::{CountRange, GenerateOptions};
use serde::{Deserialize, Serialize};

/// Options for integrity verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyOptions {
    /// Fail on any violation.
    pub strict: bool,
    /// Limit the number of violations rendered in the text report.
    pub max_examples: usize,
    pub menu_items_per_vendor: CountRange,
    pub items_per_order: CountRange,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self::from_generate(&GenerateOptions::default())
    }
}

impl VerifyOptions {
    /// Bounds taken from the options the dataset was generated with.
    pub fn from_generate(options: &GenerateOptions) -> Self {
        Self {
            strict: true,
            max_examples: 20,
            menu_items_per_vendor: options.menu_items_per_vendor,
            items_per_order: options.items_per_order,
        }
    }

    pub fn lenient(mut self) -> Self {
        self.strict = false;
        self
    }
}

/// Families of integrity checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    ReferentialClosure,
    TotalConsistency,
    StatusCoupling,
    Cardinality,
    ScenarioCoverage,
    Timestamps,
    GeoCoupling,
    Uniqueness,
    AttributeRanges,
}

impl CheckKind {
    pub const ALL: [CheckKind; 9] = [
        CheckKind::ReferentialClosure,
        CheckKind::TotalConsistency,
        CheckKind::StatusCoupling,
        CheckKind::Cardinality,
        CheckKind::ScenarioCoverage,
        CheckKind::Timestamps,
        CheckKind::GeoCoupling,
        CheckKind::Uniqueness,
        CheckKind::AttributeRanges,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CheckKind::ReferentialClosure => "referential_closure",
            CheckKind::TotalConsistency => "total_consistency",
            CheckKind::StatusCoupling => "status_coupling",
            CheckKind::Cardinality => "cardinality",
            CheckKind::ScenarioCoverage => "scenario_coverage",
            CheckKind::Timestamps => "timestamps",
            CheckKind::GeoCoupling => "geo_coupling",
            CheckKind::Uniqueness => "uniqueness",
            CheckKind::AttributeRanges => "attribute_ranges",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured violation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub check: CheckKind,
    pub code: String,
    /// Record path, e.g. `Order[3].courierId`.
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSummary {
    pub checked: u64,
    pub violations: u64,
}

/// What was verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    Dataset,
    /// Export documents carry no order items.
    Export,
}

/// Result of one verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub source: ReportSource,
    pub counts: EntityCounts,
    pub checks: BTreeMap<CheckKind, CheckSummary>,
    /// Checks (or parts of checks) that could not run for this source.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    pub violations: Vec<Violation>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violation_count(&self) -> u64 {
        self.violations.len() as u64
    }

    pub fn codes(&self) -> Vec<&str> {
        self.violations
            .iter()
            .map(|violation| violation.code.as_str())
            .collect()
    }
}
