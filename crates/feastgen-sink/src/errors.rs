use thiserror::Error;

/// Errors emitted by sinks. None of them is retried.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("table '{schema}.{table}' not found in reflected schema")]
    MissingTable { schema: String, table: String },
    #[error("column '{column}' not found on table '{schema}.{table}'")]
    MissingColumn {
        schema: String,
        table: String,
        column: String,
    },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid destination: {0}")]
    InvalidDestination(String),
}

pub type SinkResult<T> = Result<T, SinkError>;
