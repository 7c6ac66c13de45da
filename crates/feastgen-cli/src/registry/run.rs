use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use feastgen_eval::IntegrityReport;
use feastgen_generate::{GenerateOptions, GenerationReport};
use feastgen_sink::{SinkReport, write_bytes_atomic};
use serde::Serialize;

use super::RegistryResult;

/// Record of one pipeline run, written as `run.json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord<'a> {
    pub run_id: &'a str,
    pub command: &'a str,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub options: &'a GenerateOptions,
    pub generation: &'a GenerationReport,
    pub integrity: &'a IntegrityReport,
    pub sink: &'a SinkReport,
}

/// Write `<run_dir>/<run_id>/run.json` and return its path.
pub fn write_run_record(run_dir: &Path, record: &RunRecord<'_>) -> RegistryResult<PathBuf> {
    let path = run_dir.join(record.run_id).join("run.json");
    let data = serde_json::to_vec_pretty(record)?;
    write_bytes_atomic(&path, &data)?;
    Ok(path)
}
