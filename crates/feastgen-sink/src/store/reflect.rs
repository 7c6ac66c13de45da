use std::collections::BTreeMap;

use sqlx::{FromRow, PgPool};

use crate::errors::{SinkError, SinkResult};

/// Column metadata read from `information_schema.columns`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ReflectedColumn {
    pub table_name: String,
    pub name: String,
    pub ordinal_position: i32,
    pub data_type: String,
    pub udt_schema: String,
    pub udt_name: String,
    pub is_nullable: bool,
}

impl ReflectedColumn {
    /// Cast appended to a bound value. Enums and ids travel as text, so
    /// user-defined (enum) and native `uuid` columns need one.
    pub fn bind_cast(&self) -> Option<String> {
        match self.data_type.as_str() {
            "USER-DEFINED" => Some(format!(
                "::{}.{}",
                quote_ident(&self.udt_schema),
                quote_ident(&self.udt_name)
            )),
            "uuid" => Some("::uuid".to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReflectedTable {
    pub name: String,
    pub columns: BTreeMap<String, ReflectedColumn>,
}

/// Tables of one database schema, as seen by the store sink.
#[derive(Debug, Clone, Default)]
pub struct ReflectedSchema {
    pub schema: String,
    pub tables: BTreeMap<String, ReflectedTable>,
}

impl ReflectedSchema {
    pub fn from_columns(schema: &str, columns: Vec<ReflectedColumn>) -> Self {
        let mut tables: BTreeMap<String, ReflectedTable> = BTreeMap::new();
        for column in columns {
            let table = tables
                .entry(column.table_name.clone())
                .or_insert_with(|| ReflectedTable {
                    name: column.table_name.clone(),
                    columns: BTreeMap::new(),
                });
            table.columns.insert(column.name.clone(), column);
        }
        Self {
            schema: schema.to_string(),
            tables,
        }
    }

    pub fn table(&self, name: &str) -> SinkResult<&ReflectedTable> {
        self.tables.get(name).ok_or_else(|| SinkError::MissingTable {
            schema: self.schema.clone(),
            table: name.to_string(),
        })
    }

    /// Resolve the bind cast of every column, failing on the first missing one.
    pub fn casts_for(&self, table: &str, columns: &[&str]) -> SinkResult<Vec<Option<String>>> {
        let reflected = self.table(table)?;
        columns
            .iter()
            .map(|column| {
                reflected
                    .columns
                    .get(*column)
                    .map(ReflectedColumn::bind_cast)
                    .ok_or_else(|| SinkError::MissingColumn {
                        schema: self.schema.clone(),
                        table: table.to_string(),
                        column: column.to_string(),
                    })
            })
            .collect()
    }
}

/// Read column metadata for the named tables of one schema.
pub async fn reflect_tables(
    pool: &PgPool,
    schema: &str,
    tables: &[&str],
) -> SinkResult<ReflectedSchema> {
    let names: Vec<String> = tables.iter().map(|table| table.to_string()).collect();
    let columns = sqlx::query_as::<_, ReflectedColumn>(
        r#"
        select
          c.table_name::text as table_name,
          c.column_name::text as name,
          c.ordinal_position::int4 as ordinal_position,
          c.data_type::text as data_type,
          c.udt_schema::text as udt_schema,
          c.udt_name::text as udt_name,
          (c.is_nullable = 'YES') as is_nullable
        from information_schema.columns c
        where c.table_schema = $1
          and c.table_name = any($2)
        order by c.table_name, c.ordinal_position
        "#,
    )
    .bind(schema)
    .bind(names)
    .fetch_all(pool)
    .await?;

    Ok(ReflectedSchema::from_columns(schema, columns))
}

pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn qualified(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}
