//! Tabular query results.

use serde::{Deserialize, Serialize};

/// Result of executing a single SELECT statement.
///
/// Rows are already rendered to text by the executor (NULL becomes an empty
/// string). Transient: lives for one request only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryTable {
    /// Column names in result order.
    pub columns: Vec<String>,

    /// Row values, one `Vec<String>` per row, aligned with `columns`.
    pub rows: Vec<Vec<String>>,
}

impl QueryTable {
    /// Create a table from columns and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the result set is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as an aligned plain-text table.
    ///
    /// Each column is padded to the width of its widest cell (header
    /// included), with two spaces between columns. Deterministic for a
    /// given table, so the same result always produces the same prompt
    /// text for the summarizer.
    pub fn render(&self) -> String {
        if self.columns.is_empty() {
            return String::new();
        }

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let mut out = String::new();
        Self::push_row(&mut out, &self.columns, &widths);
        for row in &self.rows {
            Self::push_row(&mut out, row, &widths);
        }
        out
    }

    fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
        for (i, width) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            if i > 0 {
                out.push_str("  ");
            }
            out.push_str(cell);
            // Trailing columns are not padded past their content
            if i + 1 < widths.len() {
                for _ in cell.chars().count()..*width {
                    out.push(' ');
                }
            }
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> QueryTable {
        QueryTable::new(
            vec!["Name".to_string(), "Total".to_string()],
            vec![
                vec!["AC/DC".to_string(), "5".to_string()],
                vec!["Led Zeppelin".to_string(), "114".to_string()],
            ],
        )
    }

    #[test]
    fn test_render_pads_to_widest_cell() {
        let text = table().render();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Name          Total");
        assert_eq!(lines[1], "AC/DC         5");
        assert_eq!(lines[2], "Led Zeppelin  114");
    }

    #[test]
    fn test_render_is_stable() {
        let t = table();
        assert_eq!(t.render(), t.render());
    }

    #[test]
    fn test_render_empty_table() {
        let t = QueryTable::default();
        assert!(t.is_empty());
        assert_eq!(t.render(), "");
    }

    #[test]
    fn test_header_only_table_is_empty() {
        let t = QueryTable::new(vec!["a".to_string()], vec![]);
        assert!(t.is_empty());
        assert_eq!(t.render(), "a\n");
    }
}
