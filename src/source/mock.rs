//! source::mock
//!
//! In-memory metadata source for deterministic testing.
//!
//! # Example
//!
//! ```
//! use wavegen::source::mock::MockSource;
//! use wavegen::source::{ColumnInfo, MetadataSource};
//!
//! let mut source = MockSource::new();
//! source.add_table("dbo", "ORDERS", vec![ColumnInfo::new("ID", "int", false)], 1_000);
//!
//! let columns = source.fetch_columns("dbo", "ORDERS").unwrap();
//! assert_eq!(columns.len(), 1);
//! assert_eq!(source.fetch_row_count("dbo", "ORDERS").unwrap(), 1_000);
//! assert_eq!(source.row_count_queries, vec!["dbo.ORDERS".to_string()]);
//! ```

use std::collections::HashMap;

use super::{ColumnInfo, MetadataSource, SourceError};

#[derive(Debug, Clone)]
struct MockTable {
    columns: Vec<ColumnInfo>,
    row_count: u64,
}

/// Metadata source answering from canned tables.
///
/// Records every query so tests can assert what the planner asked for,
/// in particular that row counts are not fetched when no row limit is in
/// force. Lookups are exact on `schema.table` as configured.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    tables: HashMap<String, MockTable>,
    /// `schema.table` keys in column-query order.
    pub column_queries: Vec<String>,
    /// `schema.table` keys in row-count-query order.
    pub row_count_queries: Vec<String>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table with its columns and row count.
    pub fn add_table(&mut self, schema: &str, table: &str, columns: Vec<ColumnInfo>, rows: u64) {
        self.tables.insert(
            key(schema, table),
            MockTable {
                columns,
                row_count: rows,
            },
        );
    }

    fn lookup(&self, schema: &str, table: &str) -> Result<&MockTable, SourceError> {
        self.tables
            .get(&key(schema, table))
            .ok_or_else(|| SourceError::NoColumns {
                schema: schema.to_string(),
                table: table.to_string(),
            })
    }
}

fn key(schema: &str, table: &str) -> String {
    format!("{schema}.{table}")
}

impl MetadataSource for MockSource {
    fn fetch_columns(&mut self, schema: &str, table: &str) -> Result<Vec<ColumnInfo>, SourceError> {
        self.column_queries.push(key(schema, table));
        let entry = self.lookup(schema, table)?;
        if entry.columns.is_empty() {
            return Err(SourceError::NoColumns {
                schema: schema.to_string(),
                table: table.to_string(),
            });
        }
        Ok(entry.columns.clone())
    }

    fn fetch_row_count(&mut self, schema: &str, table: &str) -> Result<u64, SourceError> {
        self.row_count_queries.push(key(schema, table));
        Ok(self.lookup(schema, table)?.row_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_table_is_an_error() {
        let mut source = MockSource::new();
        let err = source.fetch_columns("dbo", "MISSING").unwrap_err();
        assert!(matches!(err, SourceError::NoColumns { .. }));
    }

    #[test]
    fn empty_column_list_is_an_error() {
        let mut source = MockSource::new();
        source.add_table("dbo", "EMPTY", vec![], 0);
        let err = source.fetch_columns("dbo", "EMPTY").unwrap_err();
        assert!(matches!(err, SourceError::NoColumns { .. }));
    }

    #[test]
    fn queries_are_recorded_in_order() {
        let mut source = MockSource::new();
        source.add_table("dbo", "A", vec![ColumnInfo::new("ID", "int", false)], 1);
        source.add_table("dbo", "B", vec![ColumnInfo::new("ID", "int", false)], 2);

        source.fetch_columns("dbo", "A").unwrap();
        source.fetch_columns("dbo", "B").unwrap();
        source.fetch_row_count("dbo", "B").unwrap();

        assert_eq!(source.column_queries, vec!["dbo.A", "dbo.B"]);
        assert_eq!(source.row_count_queries, vec!["dbo.B"]);
    }
}
