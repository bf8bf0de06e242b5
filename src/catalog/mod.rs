//! Schema introspection and rendering.
//!
//! Reads table/column metadata from the database catalog and serializes it
//! in a fixed human-readable layout for the SQL generation prompt.

use crate::db::Database;
use crate::types::Result;
use serde::{Deserialize, Serialize};

/// A table and its columns, in catalog order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableColumns {
    pub name: String,
    pub columns: Vec<String>,
}

/// Ordered description of every public table in the database.
///
/// Ordering comes from the catalog query (table name, then ordinal
/// position), so the same catalog always renders to the same text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub tables: Vec<TableColumns>,
}

impl CatalogSnapshot {
    /// Read the catalog from an open connection.
    ///
    /// # Errors
    ///
    /// Surfaces any connection error to the caller; no retry.
    pub async fn introspect(db: &Database) -> Result<Self> {
        let pairs = db.catalog_columns().await?;
        Ok(Self::from_columns(pairs))
    }

    /// Group ordered `(table, column)` pairs into per-table descriptions.
    pub fn from_columns(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut tables: Vec<TableColumns> = Vec::new();

        for (table, column) in pairs {
            match tables.last_mut() {
                Some(last) if last.name == table => last.columns.push(column),
                _ => tables.push(TableColumns {
                    name: table,
                    columns: vec![column],
                }),
            }
        }

        Self { tables }
    }

    /// Whether the catalog has no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Serialize in the fixed layout used by the SQL generation prompt:
    ///
    /// ```text
    ///
    /// Table: Album
    ///   - AlbumId
    ///   - Title
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        for table in &self.tables {
            out.push_str(&format!("\nTable: {}\n", table.name));
            for column in &table.columns {
                out.push_str(&format!("  - {}\n", column));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs() -> Vec<(String, String)> {
        [
            ("Album", "AlbumId"),
            ("Album", "Title"),
            ("Album", "ArtistId"),
            ("Artist", "ArtistId"),
            ("Artist", "Name"),
        ]
        .iter()
        .map(|(t, c)| (t.to_string(), c.to_string()))
        .collect()
    }

    #[test]
    fn test_from_columns_groups_consecutive_tables() {
        let snapshot = CatalogSnapshot::from_columns(pairs());
        assert_eq!(snapshot.tables.len(), 2);
        assert_eq!(snapshot.tables[0].name, "Album");
        assert_eq!(snapshot.tables[0].columns, vec!["AlbumId", "Title", "ArtistId"]);
        assert_eq!(snapshot.tables[1].name, "Artist");
    }

    #[test]
    fn test_render_layout_is_stable_and_ordered() {
        let snapshot = CatalogSnapshot::from_columns(pairs());
        let expected = "\nTable: Album\n  - AlbumId\n  - Title\n  - ArtistId\n\nTable: Artist\n  - ArtistId\n  - Name\n";
        assert_eq!(snapshot.render(), expected);
        assert_eq!(snapshot.render(), snapshot.render());
    }

    #[test]
    fn test_render_empty_catalog() {
        let snapshot = CatalogSnapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.render(), "");
    }
}
