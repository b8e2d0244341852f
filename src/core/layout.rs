//! core::layout
//!
//! Deterministic output paths for the three artifact classes.
//!
//! # Design
//!
//! A [`Layout`] is a pure value; every method derives a path from it with
//! no filesystem access. Whether a root must already exist (managed trees
//! live in a deployment repository) or may be created on demand (local
//! scratch output) is the caller's concern; this module only says where
//! things go.
//!
//! Managed mode mirrors the deployment repository convention:
//!
//! ```text
//! <base>/strimzi_conectores/envs/<env>/source/<provider>/<db>_<schema>/
//! <base>/strimzi_conectores/envs/<env>/sink/jobsnowflake/<logical>/<db>/
//! <base>/jobs/snowflake_envs/<env>/<logical>/<db>/
//! ```
//!
//! Local mode flattens the connector trees; the job tree keeps the same
//! shape in both modes because the job runner resolves it by convention.

use std::path::{Path, PathBuf};

/// Where generated artifacts land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Version-controlled deployment tree; roots must pre-exist.
    Managed,
    /// Ad hoc output tree; roots are created on demand.
    Local,
}

impl LayoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Managed => "managed",
            LayoutMode::Local => "local",
        }
    }
}

/// Pure path calculator for one wave's output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    base_dir: PathBuf,
    environment: String,
    source_provider: String,
    logical_dest: String,
    mode: LayoutMode,
}

impl Layout {
    pub fn new(
        base_dir: impl Into<PathBuf>,
        environment: impl Into<String>,
        source_provider: impl Into<String>,
        logical_dest: impl Into<String>,
        mode: LayoutMode,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            environment: environment.into(),
            source_provider: source_provider.into(),
            logical_dest: logical_dest.into(),
            mode,
        }
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Root for source-connector manifests.
    pub fn source_root(&self) -> PathBuf {
        match self.mode {
            LayoutMode::Managed => self
                .base_dir
                .join("strimzi_conectores")
                .join("envs")
                .join(&self.environment)
                .join("source")
                .join(&self.source_provider),
            LayoutMode::Local => self.base_dir.join("source").join(&self.source_provider),
        }
    }

    /// Root for sink-connector manifests.
    pub fn sink_root(&self) -> PathBuf {
        match self.mode {
            LayoutMode::Managed => self
                .base_dir
                .join("strimzi_conectores")
                .join("envs")
                .join(&self.environment)
                .join("sink")
                .join("jobsnowflake")
                .join(&self.logical_dest),
            LayoutMode::Local => self
                .base_dir
                .join("sink")
                .join("jobsnowflake")
                .join(&self.logical_dest),
        }
    }

    /// Root for destination-preparation jobs. Mode-independent.
    pub fn job_root(&self) -> PathBuf {
        self.base_dir
            .join("jobs")
            .join("snowflake_envs")
            .join(&self.environment)
            .join(&self.logical_dest)
    }

    /// All three roots, in source/sink/job order.
    pub fn roots(&self) -> [PathBuf; 3] {
        [self.source_root(), self.sink_root(), self.job_root()]
    }

    /// Per-database source directory: `<root>/<db>_<schema>`, lower-cased.
    pub fn source_dir(&self, database: &str, schema: &str) -> PathBuf {
        self.source_root()
            .join(format!("{}_{}", database, schema).to_lowercase())
    }

    /// Per-database sink directory: `<root>/<db>`, lower-cased.
    pub fn sink_dir(&self, database: &str) -> PathBuf {
        self.sink_root().join(database.to_lowercase())
    }

    /// Per-database job directory: `<root>/<db>`, lower-cased.
    pub fn job_dir(&self, database: &str) -> PathBuf {
        self.job_root().join(database.to_lowercase())
    }
}
