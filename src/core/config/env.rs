//! core::config::env
//!
//! Environment-sourced settings: per-alias credentials and the
//! process-wide defaults bag.
//!
//! # Design
//!
//! Everything here resolves through an injected lookup closure instead
//! of reading `std::env` directly, so tests exercise the resolution
//! rules without mutating process state. The `*_from_env` constructors
//! are the production entry points.
//!
//! Credentials follow the `SQLSERVER_<ALIAS>_{HOST,PORT,USER,PASSWORD}`
//! convention with the alias upper-cased. Host, user, and password are
//! required; the port defaults to 1433. Missing variables are collected
//! across all aliases before reporting, the same way config validation
//! reports every problem at once.

use thiserror::Error;

use super::schema::WaveConfig;

/// Errors from environment resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    #[error("missing required environment variable{}: {}", if vars.len() == 1 { "" } else { "s" }, vars.join(", "))]
    MissingVars { vars: Vec<String> },

    #[error("invalid value '{value}' for {var}: expected a port number")]
    InvalidPort { var: String, value: String },
}

/// Connection settings for one alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEnv {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

fn credential_var(alias: &str, key: &str) -> String {
    format!("SQLSERVER_{}_{}", alias.to_uppercase(), key)
}

impl ServerEnv {
    /// Resolve the credentials for `alias` through `lookup`.
    pub fn resolve(
        alias: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, EnvError> {
        let mut missing = Vec::new();
        let mut require = |key: &str| {
            let var = credential_var(alias, key);
            match lookup(&var) {
                Some(v) if !v.is_empty() => Some(v),
                _ => {
                    missing.push(var);
                    None
                }
            }
        };

        let host = require("HOST");
        let user = require("USER");
        let password = require("PASSWORD");

        if !missing.is_empty() {
            return Err(EnvError::MissingVars { vars: missing });
        }

        let port_var = credential_var(alias, "PORT");
        let port = match lookup(&port_var) {
            Some(raw) if !raw.is_empty() => {
                raw.parse::<u16>().map_err(|_| EnvError::InvalidPort {
                    var: port_var,
                    value: raw,
                })?
            }
            _ => 1433,
        };

        // The requires above guarantee these are present.
        Ok(Self {
            host: host.unwrap_or_default(),
            port,
            user: user.unwrap_or_default(),
            password: password.unwrap_or_default(),
        })
    }

    /// Resolve from the process environment.
    pub fn from_env(alias: &str) -> Result<Self, EnvError> {
        Self::resolve(alias, |k| std::env::var(k).ok())
    }
}

/// Check that every alias in `config` has its credentials set.
///
/// Collects all missing variables across all aliases so one error
/// message covers the whole document.
pub fn validate_credentials(
    config: &WaveConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), EnvError> {
    let mut missing = Vec::new();
    for server in &config.sqlservers {
        for key in ["HOST", "USER", "PASSWORD"] {
            let var = credential_var(&server.alias, key);
            match lookup(&var) {
                Some(v) if !v.is_empty() => {}
                _ => missing.push(var),
            }
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(EnvError::MissingVars { vars: missing })
    }
}

/// Check credentials against the process environment.
pub fn validate_credentials_from_env(config: &WaveConfig) -> Result<(), EnvError> {
    validate_credentials(config, |k| std::env::var(k).ok())
}

/// Process-wide defaults, resolved once and then read-only.
///
/// Every field has a fallback, so resolution never fails; operators
/// override individual values through the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    /// Kafka Connect cluster the connectors attach to.
    pub cluster_name: String,
    /// JDBC URL of the destination warehouse.
    pub snowflake_jdbc_url: String,
    /// Secret holding the warehouse user.
    pub snowflake_user_secret: String,
    /// Secret holding the warehouse password.
    pub snowflake_password_secret: String,
    /// Logical destination identifier used in names and paths.
    pub snowflake_logical_db: String,
    /// Configmap with warehouse connection settings for jobs.
    pub snowflake_conn_configmap: String,
    /// Warehouse role the jobs assume.
    pub snowflake_role: String,
    /// Destination database.
    pub snowflake_database: String,
    /// Brokers backing the schema-history topics.
    pub schema_history_bootstrap: String,
    /// Schema registry endpoint for the Avro converters.
    pub schema_registry_url: String,
    /// Namespace stamped on fresh kustomization documents, empty for none.
    pub kustomize_namespace: String,
}

impl Defaults {
    /// Resolve every default through `lookup`.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, fallback: &str| match lookup(key) {
            Some(v) if !v.is_empty() => v,
            _ => fallback.to_string(),
        };

        Self {
            cluster_name: get("CONNECT_CLUSTER_NAME", "inthub-prd"),
            snowflake_jdbc_url: get(
                "SNOWFLAKE_JDBC_URL",
                "jdbc:snowflake://xyz.snowflakecomputing.com/?db=LZ_SQL_IH&schema=PUBLIC",
            ),
            snowflake_user_secret: get("SNOWFLAKE_USER_SECRET", "snowflake-creds"),
            snowflake_password_secret: get("SNOWFLAKE_PASSWORD_SECRET", "snowflake-creds"),
            snowflake_logical_db: get("SNOWFLAKE_DB_LOGICAL", "lz-sql-ih-prd"),
            snowflake_conn_configmap: get("SNOWFLAKE_CONN_CONFIGMAP", "lz-sql-ih-connection"),
            snowflake_role: get("SNOWFLAKE_ROLE", "SNFLK_INTEGRATION_HUB_ROLE"),
            snowflake_database: get("SNOWFLAKE_DATABASE", "LZ_SQL_IH"),
            schema_history_bootstrap: get(
                "SCHEMA_HISTORY_BOOTSTRAP_SERVERS",
                "kafka01:9092,kafka02:9092,kafka03:9092",
            ),
            schema_registry_url: get(
                "SCHEMA_REGISTRY_URL",
                "http://schema-registry-ih.kafka-admin:8081",
            ),
            kustomize_namespace: get("KUSTOMIZE_NAMESPACE", ""),
        }
    }

    /// Resolve from the process environment.
    pub fn from_env() -> Self {
        Self::resolve(|k| std::env::var(k).ok())
    }
}
