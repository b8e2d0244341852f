//! run command - plan one wave and publish its manifests

use anyhow::{Context as _, Result};

use crate::core::config::{ServerEntry, ServerEnv};
use crate::engine::{run_wave, WaveContext, WaveOptions};
use crate::git::SystemGit;
use crate::source::{MetadataSource, MssqlMetadataSource, SourceError};
use crate::sync::SyncOutcome;
use crate::ui::Printer;

/// Plan and publish one wave.
///
/// Wires the engine to the real collaborators: the process environment,
/// a SQL Server metadata connection per alias, and git for the sync
/// stage.
pub fn run(printer: &Printer, opts: WaveOptions) -> Result<()> {
    let env = |key: &str| std::env::var(key).ok();
    let connect = |server: &ServerEntry,
                   server_env: &ServerEnv|
     -> Result<Box<dyn MetadataSource>, SourceError> {
        let source = MssqlMetadataSource::connect(&server.database, server_env)?;
        Ok(Box::new(source) as Box<dyn MetadataSource>)
    };

    let report = run_wave(
        &opts,
        WaveContext {
            printer,
            env: &env,
            connect: &connect,
            vcs: Box::new(SystemGit::new()),
        },
    )
    .with_context(|| format!("wave {} failed", opts.wave))?;

    if opts.dry_run {
        printer.info(&format!(
            "DRY-RUN complete: {} tables in {} groups, {} files planned",
            report.tables,
            report.groups,
            report.files.len()
        ));
    } else {
        printer.success(&format!(
            "Wave {} complete: {} tables in {} groups, {} files",
            opts.wave,
            report.tables,
            report.groups,
            report.files.len()
        ));
    }

    match report.outcome {
        Some(SyncOutcome::Pushed { branch }) => {
            printer.success(&format!("pushed {branch}"));
        }
        Some(SyncOutcome::NoChanges) => {
            printer.info("no changes to publish");
        }
        None => {}
    }

    Ok(())
}
