//! core::naming
//!
//! Deterministic names for connectors, topics, jobs, and artifact files.
//!
//! # Design
//!
//! Every name is a pure function of its inputs so that reruns of the same
//! wave regenerate byte-identical manifests at identical paths. Kubernetes
//! resource names and file names are lower-cased; topic segments follow
//! the capture platform's convention of upper-cased database, schema, and
//! table parts after a lower-cased prefix.
//!
//! One source connector serves one packed group, so source names carry a
//! group slug (`<wave>-g<n>`). Sinks and jobs stay per table.

use crate::core::types::{RunMode, SizeClass, TableMetadata};

/// Name prefix shared by jobs and their SQL configmaps.
const JOB_PREFIX: &str = "lz-sql-ih";

/// Slug identifying one packed group within a wave. Ordinals are 1-based.
pub fn group_slug(wave: &str, ordinal: usize) -> String {
    format!("{}-g{}", wave.to_lowercase(), ordinal)
}

/// Source connector resource name.
pub fn source_connector_name(
    database: &str,
    schema: &str,
    slug: &str,
    mode: RunMode,
    size: SizeClass,
) -> String {
    format!(
        "source-debeziumsqlserver-{}-{}-{}-{}-{}",
        database.to_lowercase(),
        schema.to_lowercase(),
        slug,
        mode,
        size
    )
}

/// Topic prefix for one source connector's captured tables.
pub fn topic_prefix(
    database: &str,
    schema: &str,
    slug: &str,
    mode: RunMode,
    size: SizeClass,
) -> String {
    format!(
        "source_debeziumsqlserver_{}_{}_{}_{}_{}",
        database.to_lowercase(),
        schema.to_lowercase(),
        slug,
        mode,
        size
    )
}

/// Internal topic holding the connector's schema history.
pub fn schema_history_topic(prefix: &str) -> String {
    format!("sh_{}", prefix)
}

/// The topic one table's changes land on.
pub fn table_topic(prefix: &str, database: &str, schema: &str, table: &str) -> String {
    format!(
        "{}.{}.{}.{}",
        prefix,
        database.to_uppercase(),
        schema.to_uppercase(),
        table.to_uppercase()
    )
}

/// Comma-joined `schema.table` list covering one group, original casing.
pub fn table_include_list(tables: &[TableMetadata]) -> String {
    tables
        .iter()
        .map(|t| format!("{}.{}", t.schema, t.name))
        .collect::<Vec<_>>()
        .join(",")
}

/// Sink connector resource name for one table.
pub fn sink_connector_name(
    logical_dest: &str,
    database: &str,
    table: &str,
    mode: RunMode,
    size: SizeClass,
) -> String {
    format!(
        "sink-jdbcsnowflake-{}-{}-{}-{}-{}-v1",
        logical_dest.to_lowercase(),
        database.to_lowercase(),
        table.to_lowercase(),
        mode,
        size
    )
}

/// Destination-preparation job name for one table.
pub fn job_name(database: &str, table: &str) -> String {
    format!(
        "{}-{}-{}-v1",
        JOB_PREFIX,
        database.to_lowercase(),
        table.to_lowercase()
    )
}

/// Configmap carrying the job's SQL script.
pub fn sql_configmap_name(database: &str, table: &str) -> String {
    format!(
        "{}-{}-{}-sql",
        JOB_PREFIX,
        database.to_lowercase(),
        table.to_lowercase()
    )
}

/// File name for one group's source-connector manifest.
pub fn source_file_name(database: &str, slug: &str) -> String {
    format!("source-{}-{}.yaml", database.to_lowercase(), slug)
}

/// File name for one table's sink-connector manifest.
pub fn sink_file_name(database: &str, table: &str) -> String {
    format!(
        "sink-{}-{}.yaml",
        database.to_lowercase(),
        table.to_lowercase()
    )
}

/// File name for one table's job manifest.
pub fn job_file_name(database: &str, table: &str) -> String {
    format!(
        "job-snowflake-{}-{}.yaml",
        database.to_lowercase(),
        table.to_lowercase()
    )
}
