//! core::types
//!
//! Domain value types shared across the planning pipeline.
//!
//! # Design
//!
//! These are plain immutable values. Metadata is collected once per table
//! and never mutated afterwards; groups are built by the grouping engine
//! and consumed exactly once to emit a source connector.

use std::fmt;

/// Everything the planner needs to know about one table.
///
/// `row_count` is `0` when row-count collection was skipped because no
/// row-based limit applies to the alias. `column_ddl` is an opaque,
/// pre-rendered column fragment destined for the destination-side DDL
/// script; the planner never inspects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMetadata {
    /// Table name as configured (original casing preserved).
    pub name: String,
    /// Schema the table lives in.
    pub schema: String,
    /// Approximate row count, `0` when not collected.
    pub row_count: u64,
    /// Rendered column definitions for the destination DDL.
    pub column_ddl: String,
}

impl TableMetadata {
    pub fn new(
        name: impl Into<String>,
        schema: impl Into<String>,
        row_count: u64,
        column_ddl: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            row_count,
            column_ddl: column_ddl.into(),
        }
    }
}

impl fmt::Display for TableMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// One bounded set of tables served by a single source connector.
///
/// Groups are append-only while packing runs and frozen afterwards.
/// `total_rows` is always the sum of the members' row counts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceGroup {
    pub tables: Vec<TableMetadata>,
    pub total_rows: u64,
}

impl SourceGroup {
    /// Start a group from its first member.
    pub fn seeded_with(table: TableMetadata) -> Self {
        let total_rows = table.row_count;
        Self {
            tables: vec![table],
            total_rows,
        }
    }

    /// Append a member, keeping `total_rows` consistent.
    pub fn push(&mut self, table: TableMetadata) {
        self.total_rows += table.row_count;
        self.tables.push(table);
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Capture mode a wave runs in, part of every connector name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Continuous change-data capture.
    #[default]
    Online,
    /// One-shot snapshot load.
    Batch,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Online => "online",
            RunMode::Batch => "batch",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sizing class for the connector resources, part of every connector name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeClass {
    /// Small.
    #[default]
    P,
    /// Medium.
    M,
    /// Large.
    G,
}

impl SizeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::P => "p",
            SizeClass::M => "m",
            SizeClass::G => "g",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
