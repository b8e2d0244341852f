//! engine::wave
//!
//! The wave orchestrator: one call plans and emits a whole wave.
//!
//! # Control flow
//!
//! Per configured server alias, strictly in order: resolve credentials,
//! connect, collect per-table metadata, pack tables into groups, then
//! emit one source manifest per group and one sink plus job manifest per
//! table. After all aliases, the touched directories get their
//! kustomization documents merged and, when sync is enabled, the
//! synchronizer commits and pushes.
//!
//! Everything is sequential; there is exactly one writer for the output
//! tree and the working copy. Dry-run performs the full computation and
//! logging but mutates nothing, so its decisions can be diffed against a
//! later real run.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::core::config::{
    validate_credentials, ConfigError, Defaults, EnvError, ServerEntry, ServerEnv, WaveConfig,
};
use crate::core::grouping::{group_tables, GroupLimits};
use crate::core::layout::{Layout, LayoutMode};
use crate::core::naming;
use crate::core::types::{RunMode, SizeClass, SourceGroup, TableMetadata};
use crate::git::Vcs;
use crate::kustomize::{self, KustomizeError};
use crate::render::{JobManifest, RenderError, Renderer, SinkManifest, SourceManifest, TemplateId};
use crate::source::{ddl, MetadataSource, SourceError};
use crate::sync::{PreparedRepo, SyncConfig, SyncError, SyncOutcome, Synchronizer};
use crate::ui::Printer;

/// Provider segment in source-connector paths.
const SOURCE_PROVIDER: &str = "debeziumsqlserver";

/// Subdirectory of the working copy holding the deployment tree.
const REPO_APPS_DIR: &str = "apps";

/// Everything one wave run needs from the caller.
#[derive(Debug, Clone)]
pub struct WaveOptions {
    pub config_path: PathBuf,
    /// Wave identifier, embedded in group slugs and the commit message.
    pub wave: String,
    pub mode: RunMode,
    pub size: SizeClass,
    /// Environment segment of managed-layout paths.
    pub environment: String,
    /// Explicit layout choice; `None` follows the sync setting.
    pub layout: Option<LayoutMode>,
    /// Output base directory when sync is disabled.
    pub out_dir: PathBuf,
    pub max_tables: Option<i64>,
    pub max_rows: Option<i64>,
    /// Branch suffix override; `None` uses the wave identifier.
    pub branch_suffix: Option<String>,
    pub dry_run: bool,
}

/// Collaborators injected into a run.
///
/// The metadata connection and the environment are closures so tests
/// drive the orchestrator without a database or process-env mutation.
pub struct WaveContext<'a> {
    pub printer: &'a Printer,
    /// Environment lookup.
    pub env: &'a dyn Fn(&str) -> Option<String>,
    /// Opens a metadata connection for one server alias.
    #[allow(clippy::type_complexity)]
    pub connect:
        &'a dyn Fn(&ServerEntry, &ServerEnv) -> Result<Box<dyn MetadataSource>, SourceError>,
    pub vcs: Box<dyn Vcs>,
}

/// Errors that abort a wave.
#[derive(Debug, Error)]
pub enum WaveError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Env(#[from] EnvError),

    /// Connecting to one alias failed.
    #[error("alias {alias}: {source}")]
    Source {
        alias: String,
        #[source]
        source: SourceError,
    },

    /// Metadata collection failed for one table.
    #[error("metadata collection failed for {schema}.{table} (alias {alias}): {source}")]
    Metadata {
        alias: String,
        schema: String,
        table: String,
        #[source]
        source: SourceError,
    },

    /// A managed-layout root is absent.
    #[error("layout root {path} does not exist; managed roots are never created implicitly")]
    MissingRoot { path: PathBuf },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Kustomize(#[from] KustomizeError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("failed to resolve the working directory: {source}")]
    WorkingDir {
        #[source]
        source: std::io::Error,
    },
}

/// What a wave run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveReport {
    /// Tables processed across all aliases.
    pub tables: usize,
    /// Groups packed across all aliases.
    pub groups: usize,
    /// Manifest paths written, or planned under dry-run.
    pub files: Vec<PathBuf>,
    /// Sync result; `None` when sync was disabled or dry-run skipped it.
    pub outcome: Option<SyncOutcome>,
}

/// Run one wave end to end.
pub fn run_wave(opts: &WaveOptions, ctx: WaveContext<'_>) -> Result<WaveReport, WaveError> {
    let WaveContext {
        printer,
        env,
        connect,
        vcs,
    } = ctx;

    let config = WaveConfig::load(&opts.config_path)?;
    config.validate()?;
    validate_credentials(&config, env)?;

    let defaults = Defaults::resolve(env);
    let sync_cfg = SyncConfig::resolve(env);
    let layout_mode = resolve_layout_mode(opts.layout, sync_cfg.is_some())?;

    let exec_dir = std::env::current_dir().map_err(|source| WaveError::WorkingDir { source })?;
    let synchronizer = sync_cfg.map(|cfg| Synchronizer::new(cfg, vcs));

    let (base_dir, prepared): (PathBuf, Option<PreparedRepo>) = match &synchronizer {
        Some(sync) => {
            if opts.dry_run {
                // Path decisions must match a real run without touching
                // the working copy.
                let work_dir = sync.config().work_dir(&exec_dir);
                (work_dir.join(REPO_APPS_DIR), None)
            } else {
                let suffix = opts.branch_suffix.as_deref().unwrap_or(&opts.wave);
                let prepared = sync.prepare(&exec_dir, Some(suffix))?;
                printer.info(&format!(
                    "Synchronizing into {} on branch {}",
                    prepared.work_dir.display(),
                    prepared.branch
                ));
                (prepared.work_dir.join(REPO_APPS_DIR), Some(prepared))
            }
        }
        None => {
            let base = if opts.out_dir.is_absolute() {
                opts.out_dir.clone()
            } else {
                exec_dir.join(&opts.out_dir)
            };
            (base, None)
        }
    };

    let layout = Layout::new(
        base_dir.as_path(),
        opts.environment.as_str(),
        SOURCE_PROVIDER,
        defaults.snowflake_logical_db.as_str(),
        layout_mode,
    );

    if layout.mode() == LayoutMode::Managed && !opts.dry_run {
        for root in layout.roots() {
            if !root.is_dir() {
                return Err(WaveError::MissingRoot { path: root });
            }
        }
    }

    let mut run = WaveRun {
        opts,
        printer,
        renderer: Renderer::new()?,
        layout,
        defaults,
        files: Vec::new(),
        merges: BTreeMap::new(),
    };

    let mut table_count = 0usize;
    let mut group_ordinal = 0usize;

    for server in &config.sqlservers {
        let limits = config.effective_limits(server, opts.max_tables, opts.max_rows);
        let server_env = ServerEnv::resolve(&server.alias, env)?;

        printer.info(&format!(
            "[{}] collecting metadata for {} table{} in {}",
            server.alias,
            server.tables.len(),
            if server.tables.len() == 1 { "" } else { "s" },
            server.database
        ));

        let mut source = connect(server, &server_env).map_err(|source| WaveError::Source {
            alias: server.alias.clone(),
            source,
        })?;

        let mut tables = Vec::with_capacity(server.tables.len());
        for entry in &server.tables {
            table_count += 1;
            let schema = entry.effective_schema(server).to_string();

            let columns = source
                .fetch_columns(&schema, &entry.name)
                .map_err(|source| metadata_error(server, &schema, &entry.name, source))?;
            let row_count = if limits.limits_rows() {
                source
                    .fetch_row_count(&schema, &entry.name)
                    .map_err(|source| metadata_error(server, &schema, &entry.name, source))?
            } else {
                0
            };

            printer.debug(&format!(
                "{}.{}: {} columns, {} rows",
                schema,
                entry.name,
                columns.len(),
                row_count
            ));

            tables.push(TableMetadata::new(
                entry.name.clone(),
                schema,
                row_count,
                ddl::build_column_ddl(&columns),
            ));
        }

        let groups = group_tables(tables, limits);
        printer.info(&format!(
            "[{}] packed into {} group{}",
            server.alias,
            groups.len(),
            if groups.len() == 1 { "" } else { "s" }
        ));

        for group in &groups {
            group_ordinal += 1;
            let slug = naming::group_slug(&opts.wave, group_ordinal);
            run.emit_group(server, &server_env, group, &slug, limits)?;
        }
    }

    run.apply_merges()?;

    let outcome = match (&synchronizer, &prepared) {
        (Some(sync), Some(prepared)) => {
            let message = format!("Ingestion wave {}", opts.wave);
            let outcome = sync.finalize(prepared, &message)?;
            Some(outcome)
        }
        _ => None,
    };

    Ok(WaveReport {
        tables: table_count,
        groups: group_ordinal,
        files: run.files,
        outcome,
    })
}

/// Mutable state shared across one run's emissions.
struct WaveRun<'a> {
    opts: &'a WaveOptions,
    printer: &'a Printer,
    renderer: Renderer,
    layout: Layout,
    defaults: Defaults,
    files: Vec<PathBuf>,
    /// Directory to new manifest names, merged after all writes.
    merges: BTreeMap<PathBuf, Vec<String>>,
}

impl WaveRun<'_> {
    /// Emit one group: a single source manifest covering all member
    /// tables, plus a sink and a job manifest per table.
    ///
    /// The source manifest is named and placed by the server's default
    /// schema; per-table schemas appear in the include list and topics.
    fn emit_group(
        &mut self,
        server: &ServerEntry,
        server_env: &ServerEnv,
        group: &SourceGroup,
        slug: &str,
        limits: GroupLimits,
    ) -> Result<(), WaveError> {
        if limits.limits_rows() && group.total_rows > limits.max_rows as u64 {
            self.printer.warn(&format!(
                "group {} holds {} rows, above the {} row limit (single oversized table)",
                slug, group.total_rows, limits.max_rows
            ));
        }

        let schema = server.default_schema();
        let prefix = naming::topic_prefix(
            &server.database,
            schema,
            slug,
            self.opts.mode,
            self.opts.size,
        );

        let manifest = SourceManifest {
            name: naming::source_connector_name(
                &server.database,
                schema,
                slug,
                self.opts.mode,
                self.opts.size,
            ),
            cluster_name: self.defaults.cluster_name.clone(),
            database_host: server_env.host.clone(),
            database_port: server_env.port.to_string(),
            database_secret: server.secret_name.clone(),
            database_name_upper: server.database.to_uppercase(),
            topic_prefix: prefix.clone(),
            table_include_list: naming::table_include_list(&group.tables),
            schema_history_bootstrap_servers: self.defaults.schema_history_bootstrap.clone(),
            schema_history_topic: naming::schema_history_topic(&prefix),
            schema_registry_url: self.defaults.schema_registry_url.clone(),
        };
        self.printer.info(&format!(
            "[{}] {} covers {}",
            server.alias, manifest.name, manifest.table_include_list
        ));
        self.emit_file(
            TemplateId::SourceConnector,
            &manifest,
            self.layout.source_dir(&server.database, schema),
            naming::source_file_name(&server.database, slug),
        )?;

        for table in &group.tables {
            let table_upper = table.name.to_uppercase();

            let sink = SinkManifest {
                name: naming::sink_connector_name(
                    &self.defaults.snowflake_logical_db,
                    &server.database,
                    &table.name,
                    self.opts.mode,
                    self.opts.size,
                ),
                cluster_name: self.defaults.cluster_name.clone(),
                topic_name: naming::table_topic(&prefix, &server.database, &table.schema, &table.name),
                snowflake_url: self.defaults.snowflake_jdbc_url.clone(),
                snowflake_user_secret: self.defaults.snowflake_user_secret.clone(),
                snowflake_password_secret: self.defaults.snowflake_password_secret.clone(),
                stage: table_upper.clone(),
                table: table_upper.clone(),
                schema: server.database.to_uppercase(),
                schema_registry_url: self.defaults.schema_registry_url.clone(),
            };
            self.emit_file(
                TemplateId::SinkConnector,
                &sink,
                self.layout.sink_dir(&server.database),
                naming::sink_file_name(&server.database, &table.name),
            )?;

            let job = JobManifest {
                job_name: naming::job_name(&server.database, &table.name),
                connection_config_map: self.defaults.snowflake_conn_configmap.clone(),
                sql_config_map_name: naming::sql_configmap_name(&server.database, &table.name),
                role: self.defaults.snowflake_role.clone(),
                database: self.defaults.snowflake_database.clone(),
                schema: server.database.to_uppercase(),
                table_ingest: format!("{table_upper}_INGEST"),
                table_final: table_upper.clone(),
                stage_name: table_upper,
                business_columns_ddl: table.column_ddl.clone(),
            };
            self.emit_file(
                TemplateId::SnowflakeJob,
                &job,
                self.layout.job_dir(&server.database),
                naming::job_file_name(&server.database, &table.name),
            )?;
        }

        Ok(())
    }

    /// Render one manifest into `dir/file_name`, or log it under
    /// dry-run. Either way the path lands in the report and the
    /// directory is queued for a kustomization merge.
    fn emit_file<S: Serialize>(
        &mut self,
        id: TemplateId,
        data: &S,
        dir: PathBuf,
        file_name: String,
    ) -> Result<(), WaveError> {
        let path = dir.join(&file_name);
        if self.opts.dry_run {
            self.printer
                .info(&format!("DRY-RUN would write {}", path.display()));
        } else {
            self.renderer.render_to_file(id, data, &path)?;
            self.printer.debug(&format!("wrote {}", path.display()));
        }
        self.files.push(path);
        self.merges.entry(dir).or_default().push(file_name);
        Ok(())
    }

    /// Merge every touched directory's kustomization document.
    fn apply_merges(&mut self) -> Result<(), WaveError> {
        if self.opts.dry_run {
            return Ok(());
        }
        for (dir, names) in &self.merges {
            kustomize::merge(dir, names, &self.defaults.kustomize_namespace)?;
        }
        Ok(())
    }
}

fn metadata_error(
    server: &ServerEntry,
    schema: &str,
    table: &str,
    source: SourceError,
) -> WaveError {
    WaveError::Metadata {
        alias: server.alias.clone(),
        schema: schema.to_string(),
        table: table.to_string(),
        source,
    }
}

/// Layout selection: an explicit flag wins, except that the local
/// layout cannot be combined with an enabled sync (the working copy
/// only understands the managed convention). Without a flag the layout
/// follows the sync setting.
fn resolve_layout_mode(
    requested: Option<LayoutMode>,
    sync_enabled: bool,
) -> Result<LayoutMode, WaveError> {
    match (requested, sync_enabled) {
        (Some(LayoutMode::Local), true) => Err(ConfigError::Invalid {
            problems: vec![
                "repository sync is enabled (GIT_REPO_URL is set) but the local layout was \
                 requested; unset GIT_REPO_URL or use the managed layout"
                    .to_string(),
            ],
        }
        .into()),
        (Some(mode), _) => Ok(mode),
        (None, true) => Ok(LayoutMode::Managed),
        (None, false) => Ok(LayoutMode::Local),
    }
}
