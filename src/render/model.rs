//! render::model
//!
//! Data handed to the manifest templates. Field names line up with the
//! `{{ var }}` placeholders in [`super::templates`] one to one.

use serde::Serialize;

/// Model for the source-connector template. One per packed group.
#[derive(Debug, Clone, Serialize)]
pub struct SourceManifest {
    pub name: String,
    pub cluster_name: String,
    pub database_host: String,
    pub database_port: String,
    pub database_secret: String,
    pub database_name_upper: String,
    pub topic_prefix: String,
    pub table_include_list: String,
    pub schema_history_bootstrap_servers: String,
    pub schema_history_topic: String,
    pub schema_registry_url: String,
}

/// Model for the sink-connector template. One per table.
#[derive(Debug, Clone, Serialize)]
pub struct SinkManifest {
    pub name: String,
    pub cluster_name: String,
    pub topic_name: String,
    pub snowflake_url: String,
    pub snowflake_user_secret: String,
    pub snowflake_password_secret: String,
    pub stage: String,
    pub table: String,
    pub schema: String,
    pub schema_registry_url: String,
}

/// Model for the snowflake-job template. One per table.
#[derive(Debug, Clone, Serialize)]
pub struct JobManifest {
    pub job_name: String,
    pub connection_config_map: String,
    pub sql_config_map_name: String,
    pub role: String,
    pub database: String,
    pub schema: String,
    pub table_ingest: String,
    pub table_final: String,
    pub stage_name: String,
    pub business_columns_ddl: String,
}
