//! PostgreSQL connection and read-only query execution.

pub mod loader;

use crate::types::{ChatError, QueryTable, Result};
use tokio_postgres::types::Type;
use tokio_postgres::{NoTls, Row};
use tracing::{debug, error};

/// Catalog query for table/column metadata.
///
/// `sql_identifier` is a domain type, so the columns are cast to text for
/// the driver. Ordering drives the deterministic schema rendering.
const CATALOG_COLUMNS_SQL: &str = "\
    SELECT table_name::text, column_name::text \
    FROM information_schema.columns \
    WHERE table_schema = 'public' \
    ORDER BY table_name, ordinal_position";

/// Handle to a PostgreSQL database.
///
/// The connection is established once and memoized for the life of the
/// process; the driver's connection task runs in the background.
pub struct Database {
    pub(crate) client: tokio_postgres::Client,
}

impl Database {
    /// Connect using a URL-style connection string.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Connection` if the connection cannot be
    /// established.
    pub async fn connect(url: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(url, NoTls)
            .await
            .map_err(|e| ChatError::Connection(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "postgres connection closed");
            }
        });

        Ok(Self { client })
    }

    /// Fetch `(table, column)` pairs from the catalog in display order.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Catalog` on any driver error.
    pub async fn catalog_columns(&self) -> Result<Vec<(String, String)>> {
        let rows = self
            .client
            .query(CATALOG_COLUMNS_SQL, &[])
            .await
            .map_err(|e| ChatError::Catalog(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| (row.get::<_, String>(0), row.get::<_, String>(1)))
            .collect())
    }

    /// Execute a SELECT statement and fetch all rows into memory.
    ///
    /// Column names are taken from the prepared statement, so an empty
    /// result set still carries its header.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::SqlExecution` with the raw driver message if
    /// preparation or execution fails.
    pub async fn run_select(&self, sql: &str) -> Result<QueryTable> {
        let statement = self
            .client
            .prepare(sql)
            .await
            .map_err(|e| ChatError::SqlExecution(e.to_string()))?;

        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let rows = self
            .client
            .query(&statement, &[])
            .await
            .map_err(|e| ChatError::SqlExecution(e.to_string()))?;

        debug!(rows = rows.len(), columns = columns.len(), "query executed");

        let rows = rows
            .iter()
            .map(|row| (0..columns.len()).map(|i| render_cell(row, i)).collect())
            .collect();

        Ok(QueryTable::new(columns, rows))
    }
}

/// Render one result cell as text. NULL becomes an empty string; a value
/// the driver cannot decode becomes a `<typename>` placeholder.
fn render_cell(row: &Row, idx: usize) -> String {
    let ty = row.columns()[idx].type_().clone();
    match ty.name() {
        "bool" => display_as::<bool>(row, idx, &ty),
        "int2" => display_as::<i16>(row, idx, &ty),
        "int4" => display_as::<i32>(row, idx, &ty),
        "int8" => display_as::<i64>(row, idx, &ty),
        "float4" => display_as::<f32>(row, idx, &ty),
        "float8" => display_as::<f64>(row, idx, &ty),
        "uuid" => display_as::<uuid::Uuid>(row, idx, &ty),
        "date" => display_as::<chrono::NaiveDate>(row, idx, &ty),
        "timestamp" => display_as::<chrono::NaiveDateTime>(row, idx, &ty),
        "timestamptz" => display_as::<chrono::DateTime<chrono::Utc>>(row, idx, &ty),
        "json" | "jsonb" => display_as::<serde_json::Value>(row, idx, &ty),
        _ => display_as::<String>(row, idx, &ty),
    }
}

fn display_as<'a, T>(row: &'a Row, idx: usize, ty: &Type) -> String
where
    T: tokio_postgres::types::FromSql<'a> + std::fmt::Display,
{
    match row.try_get::<_, Option<T>>(idx) {
        Ok(Some(value)) => value.to_string(),
        Ok(None) => String::new(),
        Err(_) => format!("<{}>", ty.name()),
    }
}
