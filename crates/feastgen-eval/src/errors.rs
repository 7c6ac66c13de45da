use thiserror::Error;

/// Errors emitted by the integrity verifier.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("invalid export document: {0}")]
    InvalidDocument(String),
    #[error("verification failed with {0} violation(s)")]
    Violations(u64),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
