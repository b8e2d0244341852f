//! source
//!
//! Table metadata acquisition: column descriptors and row counts for the
//! tables a wave covers.
//!
//! # Design
//!
//! The engine only sees the [`MetadataSource`] trait. The shipped
//! implementation ([`mssql::MssqlMetadataSource`]) reads the SQL Server
//! catalog views; [`mock::MockSource`] backs tests with canned answers.
//! Column descriptors carry the raw catalog values; translation to
//! warehouse DDL lives in [`ddl`].

pub mod ddl;
pub mod mock;
pub mod mssql;

pub use mssql::MssqlMetadataSource;

use thiserror::Error;

/// One column as described by the database catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name, original casing.
    pub name: String,
    /// Catalog data type name, e.g. `varchar` or `decimal`.
    pub data_type: String,
    /// Whether the column accepts NULL.
    pub is_nullable: bool,
    /// Declared character length; `-1` means `max`.
    pub char_max_length: Option<i32>,
    /// Numeric precision for exact numeric types.
    pub numeric_precision: Option<u8>,
    /// Numeric scale for exact numeric types.
    pub numeric_scale: Option<i32>,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, is_nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_nullable,
            char_max_length: None,
            numeric_precision: None,
            numeric_scale: None,
        }
    }

    pub fn with_length(mut self, length: i32) -> Self {
        self.char_max_length = Some(length);
        self
    }

    pub fn with_precision(mut self, precision: u8, scale: i32) -> Self {
        self.numeric_precision = Some(precision);
        self.numeric_scale = Some(scale);
        self
    }
}

/// Errors from metadata acquisition.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to connect to SQL Server at {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: tiberius::error::Error,
    },

    #[error("metadata query failed for {schema}.{table}: {source}")]
    Query {
        schema: String,
        table: String,
        #[source]
        source: tiberius::error::Error,
    },

    #[error("no columns found for {schema}.{table}")]
    NoColumns { schema: String, table: String },

    #[error("failed to start async runtime: {source}")]
    Runtime {
        #[source]
        source: std::io::Error,
    },
}

/// Supplies table metadata for one database.
///
/// Implementations connect to a single database; the engine opens one
/// source per configured server alias. Row counts are only requested when
/// a row limit is in force, so implementations must not prefetch them.
pub trait MetadataSource {
    /// Columns of `schema.table` in ordinal order.
    ///
    /// A configured table with zero catalog columns is an error: the
    /// table does not exist or the credentials cannot see it.
    fn fetch_columns(&mut self, schema: &str, table: &str) -> Result<Vec<ColumnInfo>, SourceError>;

    /// Approximate row count of `schema.table` from partition statistics.
    fn fetch_row_count(&mut self, schema: &str, table: &str) -> Result<u64, SourceError>;
}
