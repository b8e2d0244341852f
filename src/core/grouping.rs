//! core::grouping
//!
//! Packs tables into bounded source-connector groups.
//!
//! # Design
//!
//! First-fit-decreasing bin packing: tables are stably sorted by
//! descending row count, then each one lands in the first group (in
//! creation order) that still has room under both limits. Sorting large
//! tables first spreads them across groups instead of piling small
//! tables into early bins.
//!
//! Groups only ever gain members; nothing is removed or reordered after
//! creation, so the output order is the order groups were first opened.
//!
//! A table whose own row count already exceeds the row limit still gets
//! a group of its own. Rejecting it would strand the table with no path
//! into a wave, so the group is emitted over-limit and the caller is
//! expected to warn.

use crate::core::types::{SourceGroup, TableMetadata};

/// Per-group capacity limits. Zero or negative means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupLimits {
    pub max_tables: i64,
    pub max_rows: i64,
}

impl GroupLimits {
    pub fn new(max_tables: i64, max_rows: i64) -> Self {
        Self {
            max_tables,
            max_rows,
        }
    }

    pub fn unlimited() -> Self {
        Self::default()
    }

    /// True when neither limit constrains packing.
    pub fn is_unlimited(&self) -> bool {
        self.max_tables <= 0 && self.max_rows <= 0
    }

    /// True when a row-count limit is in force, which is what decides
    /// whether row counts are worth collecting at all.
    pub fn limits_rows(&self) -> bool {
        self.max_rows > 0
    }

    /// Whether `group` can take a table of `rows` more rows.
    fn admits(&self, group: &SourceGroup, rows: u64) -> bool {
        let table_ok = self.max_tables <= 0 || (group.len() as i64) < self.max_tables;
        let rows_ok = self.max_rows <= 0 || group.total_rows + rows <= self.max_rows as u64;
        table_ok && rows_ok
    }
}

/// Partition `tables` into groups honoring `limits`.
///
/// Every input table appears in exactly one output group. With both
/// limits unlimited the result is a single group holding the tables in
/// their given order. The empty input yields no groups.
pub fn group_tables(tables: Vec<TableMetadata>, limits: GroupLimits) -> Vec<SourceGroup> {
    if tables.is_empty() {
        return Vec::new();
    }

    if limits.is_unlimited() {
        let total_rows = tables.iter().map(|t| t.row_count).sum();
        return vec![SourceGroup { tables, total_rows }];
    }

    let mut ordered = tables;
    // Stable: equal row counts keep their input order.
    ordered.sort_by(|a, b| b.row_count.cmp(&a.row_count));

    let mut groups: Vec<SourceGroup> = Vec::new();
    for table in ordered {
        match groups
            .iter()
            .position(|g| limits.admits(g, table.row_count))
        {
            Some(i) => groups[i].push(table),
            None => groups.push(SourceGroup::seeded_with(table)),
        }
    }
    groups
}
