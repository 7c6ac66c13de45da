//! Integrity verification for generated datasets and export documents.

pub mod engine;
pub mod errors;
pub mod model;
pub mod report;

pub use engine::IntegrityVerifier;
pub use errors::EvalError;
pub use model::{CheckKind, CheckSummary, IntegrityReport, ReportSource, VerifyOptions, Violation};
pub use report::render_report;
