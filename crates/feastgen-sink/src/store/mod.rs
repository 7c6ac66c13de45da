//! Postgres store sink.
//!
//! Tables must already exist (migrated by the consuming app). The sink
//! reflects their columns, optionally clears them and inserts the dataset.

mod reflect;
mod rows;

pub use reflect::{
    ReflectedColumn, ReflectedSchema, ReflectedTable, qualified, quote_ident, reflect_tables,
};
pub use rows::{SqlValue, StoreRecord};

use async_trait::async_trait;
use feastgen_core::{Dataset, TABLES_IN_DEPENDENCY_ORDER};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use tracing::{debug, info};

use crate::destination::{Sink, SinkReport, TableWrite};
use crate::errors::SinkResult;

/// Postgres caps bind parameters per statement at u16::MAX.
const MAX_BIND_PARAMS: usize = u16::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOptions {
    pub schema: String,
    pub clear: bool,
    pub suspend_constraints: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            schema: "public".to_string(),
            clear: true,
            suspend_constraints: false,
        }
    }
}

/// Sink writing into a live Postgres database.
#[derive(Debug, Clone)]
pub struct PostgresSink {
    pool: PgPool,
    options: StoreOptions,
}

impl PostgresSink {
    pub fn new(pool: PgPool, options: StoreOptions) -> Self {
        Self { pool, options }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Delete every row of the five tables, children first.
    pub async fn clear(&self) -> SinkResult<()> {
        let mut tx = self.pool.begin().await?;
        if self.options.suspend_constraints {
            sqlx::query("SET LOCAL session_replication_role = replica")
                .execute(&mut *tx)
                .await?;
        }
        for table in TABLES_IN_DEPENDENCY_ORDER.iter().rev() {
            let sql = format!("DELETE FROM {}", qualified(&self.options.schema, table));
            let deleted = sqlx::query(&sql).execute(&mut *tx).await?.rows_affected();
            info!(table = *table, rows = deleted, "table cleared");
        }
        tx.commit().await?;
        Ok(())
    }

    /// Reflect the five tables and check every written column exists.
    pub async fn prepare(&self) -> SinkResult<ReflectedSchema> {
        let reflected =
            reflect_tables(&self.pool, &self.options.schema, &TABLES_IN_DEPENDENCY_ORDER).await?;
        check_columns(&reflected)?;
        Ok(reflected)
    }

    /// Insert every table in dependency order inside one transaction.
    pub async fn insert(
        &self,
        reflected: &ReflectedSchema,
        dataset: &Dataset,
    ) -> SinkResult<Vec<TableWrite>> {
        let mut tx = self.pool.begin().await?;
        let tables = vec![
            insert_records(&mut tx, reflected, &dataset.users).await?,
            insert_records(&mut tx, reflected, &dataset.vendors).await?,
            insert_records(&mut tx, reflected, &dataset.menu_items).await?,
            insert_records(&mut tx, reflected, &dataset.orders).await?,
            insert_records(&mut tx, reflected, &dataset.order_items).await?,
        ];
        tx.commit().await?;
        Ok(tables)
    }
}

#[async_trait]
impl Sink for PostgresSink {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    async fn deliver(&self, dataset: &Dataset) -> SinkResult<SinkReport> {
        // Missing tables or columns must fail before any row is deleted.
        let reflected = self.prepare().await?;
        if self.options.clear {
            self.clear().await?;
        }
        let tables = self.insert(&reflected, dataset).await?;
        Ok(SinkReport {
            sink: self.kind().to_string(),
            tables,
            path: None,
            bytes_written: None,
        })
    }
}

fn check_columns(reflected: &ReflectedSchema) -> SinkResult<()> {
    use feastgen_core::{MenuItem, Order, OrderItem, User, VendorProfile};

    reflected.casts_for(User::TABLE, User::COLUMNS)?;
    reflected.casts_for(VendorProfile::TABLE, VendorProfile::COLUMNS)?;
    reflected.casts_for(MenuItem::TABLE, MenuItem::COLUMNS)?;
    reflected.casts_for(Order::TABLE, Order::COLUMNS)?;
    reflected.casts_for(OrderItem::TABLE, OrderItem::COLUMNS)?;
    Ok(())
}

/// Rows per statement so that one statement stays under the bind limit.
pub fn rows_per_statement(columns: usize) -> usize {
    (MAX_BIND_PARAMS / columns.max(1)).max(1)
}

async fn insert_records<T: StoreRecord>(
    tx: &mut Transaction<'_, Postgres>,
    reflected: &ReflectedSchema,
    records: &[T],
) -> SinkResult<TableWrite> {
    let casts = reflected.casts_for(T::TABLE, T::COLUMNS)?;
    let table = qualified(&reflected.schema, T::TABLE);
    let column_list = T::COLUMNS
        .iter()
        .map(|column| quote_ident(column))
        .collect::<Vec<_>>()
        .join(", ");

    let mut inserted = 0u64;
    for chunk in records.chunks(rows_per_statement(T::COLUMNS.len())) {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("INSERT INTO {table} ({column_list}) "));
        builder.push_values(chunk, |mut row, record| {
            for (value, cast) in record.values().into_iter().zip(&casts) {
                value.push_bind(&mut row);
                if let Some(cast) = cast {
                    row.push_unseparated(cast.as_str());
                }
            }
        });
        let result = builder.build().execute(&mut **tx).await?;
        debug!(table = T::TABLE, rows = result.rows_affected(), "chunk inserted");
        inserted += result.rows_affected();
    }

    info!(table = T::TABLE, rows = inserted, "table inserted");
    Ok(TableWrite {
        table: T::TABLE.to_string(),
        rows: inserted,
    })
}

/// Hide the password of a connection URL before it reaches a log line.
pub fn redact_database_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let authority_start = scheme_end + 3;
    let rest = &url[authority_start..];
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let Some(at) = rest[..authority_end].rfind('@') else {
        return url.to_string();
    };
    let Some(colon) = rest[..at].find(':') else {
        return url.to_string();
    };

    let mut redacted = url.to_string();
    redacted.replace_range(authority_start + colon + 1..authority_start + at, "***");
    redacted
}
