//! core::config::schema
//!
//! Wave configuration schema types.
//!
//! # Shape
//!
//! ```yaml
//! defaults:                  # optional wave-level packing limits
//!   maxTablesPerSource: 10
//!   maxRowsPerSource: 50000000
//! sqlservers:
//!   - alias: crm
//!     database: CRMDB
//!     schema: dbo            # optional, defaults to dbo
//!     secretName: sqlserver-origem-crm
//!     maxTablesPerSource: 5  # optional per-alias override
//!     tables:
//!       - name: CUSTOMERS
//!       - name: ORDERS
//!         schema: sales      # optional per-table override
//! ```
//!
//! # Validation
//!
//! [`WaveConfig::validate`] is a total pass: it walks the whole document
//! and returns every problem found, so one round trip fixes them all.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::grouping::GroupLimits;

/// Schema assumed when neither a server nor a table names one.
pub const DEFAULT_SCHEMA: &str = "dbo";

/// Root of the wave configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct WaveConfig {
    /// Wave-level packing limits, overridable per alias.
    pub defaults: Option<LimitDefaults>,

    /// Source instances to plan, processed in order.
    pub sqlservers: Vec<ServerEntry>,
}

/// Wave-level packing limits. Absent or non-positive means unlimited.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct LimitDefaults {
    pub max_tables_per_source: Option<i64>,
    pub max_rows_per_source: Option<i64>,
}

/// One configured SQL Server instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ServerEntry {
    /// Logical identifier; also keys the credential environment variables.
    pub alias: String,

    /// Database to capture from.
    pub database: String,

    /// Default schema for this server's tables.
    pub schema: Option<String>,

    /// Kubernetes secret holding the capture credentials.
    pub secret_name: String,

    /// Per-alias override of the wave-level table limit.
    pub max_tables_per_source: Option<i64>,

    /// Per-alias override of the wave-level row limit.
    pub max_rows_per_source: Option<i64>,

    /// Tables to capture, processed in order.
    pub tables: Vec<TableEntry>,
}

impl ServerEntry {
    /// The server's default schema, falling back to [`DEFAULT_SCHEMA`].
    pub fn default_schema(&self) -> &str {
        match self.schema.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => DEFAULT_SCHEMA,
        }
    }
}

/// One table to capture.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct TableEntry {
    pub name: String,

    /// Schema override for this table only.
    pub schema: Option<String>,
}

impl TableEntry {
    /// The schema this table is read from, after server and global defaults.
    pub fn effective_schema<'a>(&'a self, server: &'a ServerEntry) -> &'a str {
        match self.schema.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => server.default_schema(),
        }
    }
}

impl WaveConfig {
    /// Read and deserialize a wave configuration file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not well-formed YAML for
    /// this schema. Semantic checks live in [`WaveConfig::validate`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Check the whole document and report every problem found.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] listing all problems: missing or
    /// duplicate aliases (case-insensitive), missing database or secret
    /// names, empty table lists, empty table names, and tables configured
    /// twice under the same alias, database, and schema.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if self.sqlservers.is_empty() {
            problems.push("no sqlservers configured".to_string());
        }

        let mut seen_aliases: HashSet<String> = HashSet::new();
        for (i, server) in self.sqlservers.iter().enumerate() {
            let label = if server.alias.is_empty() {
                format!("sqlservers[{i}]")
            } else {
                format!("alias '{}'", server.alias)
            };

            if server.alias.is_empty() {
                problems.push(format!("{label}: alias is required"));
            } else if !seen_aliases.insert(server.alias.to_uppercase()) {
                problems.push(format!("duplicate alias '{}'", server.alias));
            }

            if server.database.is_empty() {
                problems.push(format!("{label}: database is required"));
            }
            if server.secret_name.is_empty() {
                problems.push(format!("{label}: secretName is required"));
            }
            if server.tables.is_empty() {
                problems.push(format!("{label}: at least one table is required"));
            }

            let mut seen_tables: HashSet<String> = HashSet::new();
            for (j, table) in server.tables.iter().enumerate() {
                if table.name.is_empty() {
                    problems.push(format!("{label}: tables[{j}] has an empty name"));
                    continue;
                }
                let key = format!(
                    "{}|{}|{}|{}",
                    server.alias.to_uppercase(),
                    server.database.to_uppercase(),
                    table.effective_schema(server).to_uppercase(),
                    table.name.to_uppercase()
                );
                if !seen_tables.insert(key) {
                    problems.push(format!(
                        "{label}: table '{}.{}' configured more than once",
                        table.effective_schema(server),
                        table.name
                    ));
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid { problems })
        }
    }

    /// Packing limits for one server, after all overrides.
    ///
    /// Precedence per field: alias override, then CLI flag, then the
    /// wave-level default; anything unset means unlimited.
    pub fn effective_limits(
        &self,
        server: &ServerEntry,
        cli_tables: Option<i64>,
        cli_rows: Option<i64>,
    ) -> GroupLimits {
        let defaults = self.defaults.unwrap_or_default();
        let max_tables = server
            .max_tables_per_source
            .or(cli_tables)
            .or(defaults.max_tables_per_source)
            .unwrap_or(0);
        let max_rows = server
            .max_rows_per_source
            .or(cli_rows)
            .or(defaults.max_rows_per_source)
            .unwrap_or(0);
        GroupLimits::new(max_tables, max_rows)
    }
}
