//! Run bookkeeping: logging setup and per-run records.

mod logging;
mod run;

pub use logging::{LogFormat, init_logging};
pub use run::{RunRecord, write_run_record};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
