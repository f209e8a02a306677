//! Database gateway over a single PostgreSQL connection.
//!
//! One connection per session, no pool. Statements run exactly as given.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::types::Decimal;
use sqlx::{Column, Connection, PgConnection, Row, TypeInfo};
use tokio::sync::Mutex;

use crate::config::ConnectionConfig;
use crate::error::{DbError, Result};
use crate::render::{self, CellValue, ColumnInfo, TableInfo, MAX_STRING_LENGTH, SAMPLE_ROWS};

/// What the responders need from a database
#[async_trait]
pub trait SqlDatabase: Send + Sync {
    /// Description of every table and column, fetched fresh on each call
    async fn schema_text(&self) -> Result<String>;

    /// Run `sql` unmodified and render the rows as text
    async fn execute(&self, sql: &str) -> Result<String>;
}

#[derive(sqlx::FromRow)]
struct ColumnRow {
    table_name: String,
    column_name: String,
    data_type: String,
    is_nullable: String,
}

/// Live connection to the interaction database
pub struct DatabaseHandle {
    conn: Mutex<PgConnection>,
}

impl DatabaseHandle {
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let conn = PgConnection::connect(&config.url())
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Connected to database"
        );

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub async fn close(self) -> Result<()> {
        self.conn
            .into_inner()
            .close()
            .await
            .map_err(|e| DbError::Connection(e.to_string()))
    }

    async fn tables(&self, conn: &mut PgConnection) -> Result<Vec<TableInfo>> {
        // information_schema columns are domain types; cast so they decode as text
        let rows = sqlx::query_as::<_, ColumnRow>(
            "SELECT c.table_name::text AS table_name, c.column_name::text AS column_name, \
                    c.data_type::text AS data_type, c.is_nullable::text AS is_nullable \
             FROM information_schema.columns c \
             JOIN information_schema.tables t \
               ON t.table_schema = c.table_schema AND t.table_name = c.table_name \
             WHERE c.table_schema = 'public' AND t.table_type = 'BASE TABLE' \
             ORDER BY c.table_name, c.ordinal_position",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| DbError::Query(format!("Failed to read schema: {}", e)))?;

        Ok(TableInfo::group(rows.into_iter().map(|r| {
            (
                r.table_name,
                ColumnInfo {
                    name: r.column_name,
                    data_type: r.data_type,
                    nullable: r.is_nullable == "YES",
                },
            )
        })))
    }

    async fn sample_rows(&self, conn: &mut PgConnection, table: &str) -> Result<Vec<Map<String, Value>>> {
        let sql = format!(
            "SELECT row_to_json(t)::text FROM (SELECT * FROM {} LIMIT {}) t",
            quote_ident(table),
            SAMPLE_ROWS
        );

        let rows: Vec<(String,)> = sqlx::query_as(&sql)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| DbError::Query(format!("Failed to sample {}: {}", table, e)))?;

        rows.into_iter()
            .map(|(json,)| match serde_json::from_str::<Value>(&json) {
                Ok(Value::Object(map)) => Ok(map),
                Ok(other) => Err(DbError::Decode(format!("expected a JSON object, got {}", other))),
                Err(e) => Err(DbError::Decode(e.to_string())),
            })
            .collect()
    }
}

#[async_trait]
impl SqlDatabase for DatabaseHandle {
    async fn schema_text(&self) -> Result<String> {
        let mut conn = self.conn.lock().await;

        let tables = self.tables(&mut conn).await?;
        let mut blocks = Vec::with_capacity(tables.len());
        for table in &tables {
            let samples = samples_or_empty(&table.name, self.sample_rows(&mut conn, &table.name).await);
            blocks.push(table.describe(&samples));
        }

        tracing::debug!(tables = tables.len(), "Read schema");
        Ok(blocks.join("\n\n"))
    }

    async fn execute(&self, sql: &str) -> Result<String> {
        let mut conn = self.conn.lock().await;

        let rows = sqlx::query(sql)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| DbError::Query(e.to_string()))?;

        tracing::debug!(rows = rows.len(), "Executed query");

        let cells = rows
            .iter()
            .map(decode_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(render::render_rows(&cells))
    }
}

/// A table whose rows cannot be read is described without samples
fn samples_or_empty(table: &str, samples: Result<Vec<Map<String, Value>>>) -> Vec<Map<String, Value>> {
    samples.unwrap_or_else(|e| {
        tracing::warn!(table, error = %e, "Skipping sample rows");
        Vec::new()
    })
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn decode_row(row: &PgRow) -> Result<Vec<CellValue>> {
    (0..row.columns().len())
        .map(|idx| decode_cell(row, idx).map(|cell| cell.truncated(MAX_STRING_LENGTH)))
        .collect()
}

fn decode_cell(row: &PgRow, idx: usize) -> Result<CellValue> {
    let type_name = row.columns()[idx].type_info().name().to_string();
    let decode_err = |e: sqlx::Error| DbError::Decode(format!("column {}: {}", idx, e));

    let cell: CellValue = match type_name.as_str() {
        "BOOL" => row.try_get::<Option<bool>, _>(idx).map_err(decode_err)?.into(),
        "INT2" => row
            .try_get::<Option<i16>, _>(idx)
            .map_err(decode_err)?
            .map(i64::from)
            .into(),
        "INT4" => row
            .try_get::<Option<i32>, _>(idx)
            .map_err(decode_err)?
            .map(i64::from)
            .into(),
        "INT8" => row.try_get::<Option<i64>, _>(idx).map_err(decode_err)?.into(),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(idx)
            .map_err(decode_err)?
            .map(f64::from)
            .into(),
        "FLOAT8" => row.try_get::<Option<f64>, _>(idx).map_err(decode_err)?.into(),
        "NUMERIC" => row
            .try_get::<Option<Decimal>, _>(idx)
            .map_err(decode_err)?
            .map(|v| CellValue::Decimal(v.to_string()))
            .into(),
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" | "CITEXT" => {
            row.try_get::<Option<String>, _>(idx).map_err(decode_err)?.into()
        }
        "JSON" | "JSONB" => row
            .try_get::<Option<Value>, _>(idx)
            .map_err(decode_err)?
            .map(|v| v.to_string())
            .into(),
        "UUID" => row
            .try_get::<Option<uuid::Uuid>, _>(idx)
            .map_err(decode_err)?
            .map(|v| v.to_string())
            .into(),
        "DATE" => row
            .try_get::<Option<chrono::NaiveDate>, _>(idx)
            .map_err(decode_err)?
            .map(|v| v.to_string())
            .into(),
        "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(idx)
            .map_err(decode_err)?
            .map(|v| v.to_string())
            .into(),
        "TIMESTAMPTZ" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx)
            .map_err(decode_err)?
            .map(|v| v.to_rfc3339())
            .into(),
        _ => CellValue::Unsupported(type_name.clone()),
    };

    Ok(cell)
}
