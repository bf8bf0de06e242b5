//! CSV table loading.
//!
//! Replaces one table per CSV file: the table is named after the file stem,
//! columns come from the header row, and column types are inferred from the
//! data (BIGINT, DOUBLE PRECISION, or TEXT).

use crate::db::Database;
use crate::types::{ChatError, Result};
use std::path::Path;
use tokio_postgres::types::ToSql;
use tracing::info;

/// Outcome of loading a single CSV file.
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// Name of the created table.
    pub table: String,

    /// Number of rows inserted.
    pub rows: u64,
}

/// Inferred SQL type for a CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    BigInt,
    Double,
    Text,
}

impl ColumnType {
    fn sql_name(self) -> &'static str {
        match self {
            ColumnType::BigInt => "BIGINT",
            ColumnType::Double => "DOUBLE PRECISION",
            ColumnType::Text => "TEXT",
        }
    }
}

/// Load a CSV file into the database, replacing any existing table with the
/// same name.
///
/// # Errors
///
/// Returns `ChatError::Csv` for malformed input, `ChatError::Config` for a
/// file with no usable name, or `ChatError::SqlExecution` if any statement
/// fails.
pub async fn load_csv(db: &Database, path: &Path) -> Result<LoadReport> {
    let table = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            ChatError::Config(format!("cannot derive table name from {}", path.display()))
        })?
        .to_string();

    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut records: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(|f| f.to_string()).collect());
    }

    let types = infer_column_types(&headers, &records);

    let column_defs = headers
        .iter()
        .zip(&types)
        .map(|(name, ty)| format!("{} {}", quote_ident(name), ty.sql_name()))
        .collect::<Vec<_>>()
        .join(", ");

    let drop_sql = format!("DROP TABLE IF EXISTS {}", quote_ident(&table));
    db.client
        .execute(drop_sql.as_str(), &[])
        .await
        .map_err(|e| ChatError::SqlExecution(e.to_string()))?;

    let create_sql = format!("CREATE TABLE {} ({})", quote_ident(&table), column_defs);
    db.client
        .execute(create_sql.as_str(), &[])
        .await
        .map_err(|e| ChatError::SqlExecution(e.to_string()))?;

    let placeholders = (1..=headers.len())
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>()
        .join(", ");
    let insert_sql = format!(
        "INSERT INTO {} VALUES ({})",
        quote_ident(&table),
        placeholders
    );
    let insert = db
        .client
        .prepare(&insert_sql)
        .await
        .map_err(|e| ChatError::SqlExecution(e.to_string()))?;

    let mut inserted = 0u64;
    for record in &records {
        let values: Vec<Box<dyn ToSql + Sync + Send>> = record
            .iter()
            .zip(&types)
            .map(|(cell, ty)| bind_cell(cell, *ty))
            .collect();
        let params: Vec<&(dyn ToSql + Sync)> =
            values.iter().map(|v| v.as_ref() as &(dyn ToSql + Sync)).collect();

        db.client
            .execute(&insert, &params)
            .await
            .map_err(|e| ChatError::SqlExecution(e.to_string()))?;
        inserted += 1;
    }

    info!(table = %table, rows = inserted, "loaded CSV file");

    Ok(LoadReport {
        table,
        rows: inserted,
    })
}

/// Infer a SQL type per column from the data.
///
/// A column is BIGINT if every non-empty cell parses as i64, DOUBLE
/// PRECISION if every non-empty cell parses as f64, otherwise TEXT.
/// Empty cells (NULLs) do not affect the inference; an entirely empty
/// column falls back to TEXT.
pub fn infer_column_types(headers: &[String], records: &[Vec<String>]) -> Vec<ColumnType> {
    (0..headers.len())
        .map(|idx| {
            let mut seen_value = false;
            let mut all_int = true;
            let mut all_float = true;

            for record in records {
                let cell = record.get(idx).map(String::as_str).unwrap_or("");
                if cell.is_empty() {
                    continue;
                }
                seen_value = true;
                if cell.parse::<i64>().is_err() {
                    all_int = false;
                }
                if cell.parse::<f64>().is_err() {
                    all_float = false;
                }
            }

            if !seen_value {
                ColumnType::Text
            } else if all_int {
                ColumnType::BigInt
            } else if all_float {
                ColumnType::Double
            } else {
                ColumnType::Text
            }
        })
        .collect()
}

/// Bind one CSV cell as a typed SQL parameter. Empty cells bind as NULL.
fn bind_cell(cell: &str, ty: ColumnType) -> Box<dyn ToSql + Sync + Send> {
    if cell.is_empty() {
        return Box::new(Option::<String>::None);
    }
    match ty {
        ColumnType::BigInt => Box::new(cell.parse::<i64>().ok()),
        ColumnType::Double => Box::new(cell.parse::<f64>().ok()),
        ColumnType::Text => Box::new(cell.to_string()),
    }
}

/// Double-quote an identifier, escaping embedded quotes.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_infer_integer_column() {
        let headers = vec!["id".to_string()];
        let records = rows(&[&["1"], &["2"], &["30"]]);
        assert_eq!(infer_column_types(&headers, &records), vec![ColumnType::BigInt]);
    }

    #[test]
    fn test_infer_float_column() {
        let headers = vec!["price".to_string()];
        let records = rows(&[&["0.99"], &["12"], &["3.5"]]);
        assert_eq!(infer_column_types(&headers, &records), vec![ColumnType::Double]);
    }

    #[test]
    fn test_infer_text_column() {
        let headers = vec!["name".to_string()];
        let records = rows(&[&["AC/DC"], &["42"]]);
        assert_eq!(infer_column_types(&headers, &records), vec![ColumnType::Text]);
    }

    #[test]
    fn test_empty_cells_do_not_force_text() {
        let headers = vec!["fk".to_string()];
        let records = rows(&[&["1"], &[""], &["3"]]);
        assert_eq!(infer_column_types(&headers, &records), vec![ColumnType::BigInt]);
    }

    #[test]
    fn test_all_empty_column_is_text() {
        let headers = vec!["blank".to_string()];
        let records = rows(&[&[""], &[""]]);
        assert_eq!(infer_column_types(&headers, &records), vec![ColumnType::Text]);
    }

    #[test]
    fn test_quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("Track"), "\"Track\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_csv_reading_from_file() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Album.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "AlbumId,Title,ArtistId").unwrap();
        writeln!(file, "1,For Those About To Rock,1").unwrap();
        writeln!(file, "2,Balls to the Wall,2").unwrap();
        drop(file);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        let records: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();

        assert_eq!(headers, vec!["AlbumId", "Title", "ArtistId"]);
        assert_eq!(
            infer_column_types(&headers, &records),
            vec![ColumnType::BigInt, ColumnType::Text, ColumnType::BigInt]
        );
    }
}
