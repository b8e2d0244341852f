//! check command - validate configuration and environment

use std::path::Path;

use anyhow::{bail, Result};

use crate::core::config::{validate_credentials, ConfigError, WaveConfig};
use crate::sync::SyncConfig;
use crate::ui::Printer;

/// Validate the wave configuration and environment.
///
/// Collects every problem before reporting so one invocation shows the
/// full picture. No database or repository is touched.
pub fn check(printer: &Printer, config_path: &Path) -> Result<()> {
    let env = |key: &str| std::env::var(key).ok();

    let config = WaveConfig::load(config_path)?;
    let problems = gather_problems(&config, &env)?;

    if !problems.is_empty() {
        for problem in &problems {
            printer.error(problem);
        }
        bail!(
            "configuration check found {} problem{}",
            problems.len(),
            if problems.len() == 1 { "" } else { "s" }
        );
    }

    let tables: usize = config.sqlservers.iter().map(|s| s.tables.len()).sum();
    printer.success(&format!(
        "Configuration OK: {} server{}, {} table{}",
        config.sqlservers.len(),
        if config.sqlservers.len() == 1 { "" } else { "s" },
        tables,
        if tables == 1 { "" } else { "s" }
    ));
    match SyncConfig::resolve(&env) {
        Some(sync) => printer.info(&format!(
            "Repository sync enabled: {} (base {})",
            sync.repo_url, sync.base_branch
        )),
        None => printer.info("Repository sync disabled (GIT_REPO_URL not set)"),
    }

    Ok(())
}

/// Run every validation pass, returning the flattened problem list.
fn gather_problems(
    config: &WaveConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Vec<String>> {
    let mut problems = Vec::new();

    if let Err(err) = config.validate() {
        match err {
            ConfigError::Invalid { problems: found } => problems.extend(found),
            other => return Err(other.into()),
        }
    }
    if let Err(err) = validate_credentials(config, lookup) {
        problems.push(err.to_string());
    }

    Ok(problems)
}
