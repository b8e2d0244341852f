//! core::config
//!
//! Wave configuration: schema, loading, and environment resolution.
//!
//! # Overview
//!
//! A wave is described by a YAML file listing SQL Server instances
//! (aliases) and the tables to capture from each. Credentials never
//! live in that file; they come from `SQLSERVER_<ALIAS>_*` environment
//! variables. Process-wide defaults (cluster names, destination
//! settings) resolve once from the environment into a read-only bag.
//!
//! # Loading and validation
//!
//! Parsing and validation are separate passes: [`WaveConfig::load`]
//! only deserializes, [`WaveConfig::validate`] then checks the whole
//! document and reports every problem at once rather than stopping at
//! the first. Callers run both before touching any field.
//!
//! # Example
//!
//! ```no_run
//! use wavegen::core::config::WaveConfig;
//! use std::path::Path;
//!
//! let config = WaveConfig::load(Path::new("config/ingestion.yaml"))?;
//! config.validate()?;
//! for server in &config.sqlservers {
//!     println!("{}: {} tables", server.alias, server.tables.len());
//! }
//! # Ok::<(), wavegen::core::config::ConfigError>(())
//! ```

pub mod env;
pub mod schema;

pub use env::{validate_credentials, validate_credentials_from_env, Defaults, EnvError, ServerEnv};
pub use schema::{LimitDefaults, ServerEntry, TableEntry, WaveConfig};

use std::path::PathBuf;
use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read wave config '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse wave config '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid wave config ({} problem{}):\n  - {}", problems.len(), if problems.len() == 1 { "" } else { "s" }, problems.join("\n  - "))]
    Invalid { problems: Vec<String> },
}
