use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use feastgen_core::Dataset;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::errors::{SinkError, SinkResult};
use crate::export::ExportSink;
use crate::store::{PostgresSink, StoreOptions, redact_database_url};

/// Default export filename.
pub const DEFAULT_EXPORT_PATH: &str = "mock_data.json";

/// Where a generated dataset goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Destination {
    /// Live Postgres database with the five entity tables already migrated.
    Store(StoreDestination),
    /// Single nested JSON document on disk.
    Export(ExportDestination),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDestination {
    pub database_url: String,
    #[serde(default = "default_db_schema")]
    pub schema: String,
    /// Delete existing rows (reverse dependency order) before inserting.
    #[serde(default = "default_true")]
    pub clear: bool,
    /// Disable FK triggers for the clear transaction. Needs superuser.
    #[serde(default)]
    pub suspend_constraints: bool,
}

impl StoreDestination {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            schema: default_db_schema(),
            clear: true,
            suspend_constraints: false,
        }
    }

    pub fn options(&self) -> StoreOptions {
        StoreOptions {
            schema: self.schema.clone(),
            clear: self.clear,
            suspend_constraints: self.suspend_constraints,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDestination {
    pub path: PathBuf,
}

impl Default for ExportDestination {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_EXPORT_PATH),
        }
    }
}

fn default_db_schema() -> String {
    "public".to_string()
}

fn default_true() -> bool {
    true
}

/// Rows written per table, in the order they were written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkReport {
    pub sink: String,
    pub tables: Vec<TableWrite>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_written: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableWrite {
    pub table: String,
    pub rows: u64,
}

/// Consumer of a finished dataset.
#[async_trait]
pub trait Sink {
    /// Sink identifier (e.g. `postgres`, `json`).
    fn kind(&self) -> &'static str;

    /// Write every record of the dataset. Failures are fatal to the run.
    async fn deliver(&self, dataset: &Dataset) -> SinkResult<SinkReport>;
}

/// Route a dataset to its destination.
pub async fn deliver(dataset: &Dataset, destination: &Destination) -> SinkResult<SinkReport> {
    match destination {
        Destination::Export(export) => ExportSink::new(export.path.clone()).deliver(dataset).await,
        Destination::Store(store) => {
            if store.database_url.trim().is_empty() {
                return Err(SinkError::InvalidDestination(
                    "store destination needs a database url".to_string(),
                ));
            }
            info!(
                database = %redact_database_url(&store.database_url),
                schema = %store.schema,
                "connecting to store"
            );
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(10))
                .connect(&store.database_url)
                .await?;
            let sink = PostgresSink::new(pool, store.options());
            sink.deliver(dataset).await
        }
    }
}
