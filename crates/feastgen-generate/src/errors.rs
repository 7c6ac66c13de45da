use thiserror::Error;

/// Errors emitted by the generation engine and entity factories.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A downstream stage was handed an empty identifier set to bind against.
    #[error("cannot generate {stage}: no {parent} ids to reference")]
    EmptyUpstream {
        stage: &'static str,
        parent: &'static str,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("could not mint a unique {field} after {attempts} attempts")]
    UniqueExhausted { field: &'static str, attempts: u32 },
}
