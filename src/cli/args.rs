//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::layout::LayoutMode;
use crate::core::types::{RunMode, SizeClass};

/// Wavegen - plan and publish streaming-ingestion connector waves
#[derive(Parser, Debug)]
#[command(name = "wavegen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plan one ingestion wave and publish its manifests
    #[command(
        name = "run",
        long_about = "Plan one ingestion wave and publish its manifests.\n\n\
            Reads the wave configuration, collects column and row-count metadata \
            from every listed SQL Server table, packs the tables into bounded \
            capture groups, and renders one source connector per group plus one \
            sink connector and one bootstrap job per table.\n\n\
            When GIT_REPO_URL is set the manifests land inside a working copy of \
            the deployment repository and are committed and pushed on a fresh \
            branch. Otherwise they are written under --out.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Publish wave 12 to the deployment repository
    export GIT_REPO_URL=git@example.com:platform/deploy.git
    wavegen run --config ingestion.yaml --wave 12

    # Preview the same wave without writing anything
    wavegen run --config ingestion.yaml --wave 12 --dry-run

    # Local output tree, batch mode, large connectors
    wavegen run --config ingestion.yaml --wave 12 --mode batch --size g --out ./out

LIMITS:
    --max-tables and --max-rows cap each capture group. Per-alias limits in
    the configuration win over these flags; these flags win over the
    configuration defaults. A value of 0 or less disables the limit."
    )]
    Run {
        /// Ingestion configuration file
        #[arg(short, long, value_name = "FILE", default_value = "config.yaml")]
        config: PathBuf,

        /// Wave identifier; names the groups, the branch, and the commit
        #[arg(short, long, value_name = "ID")]
        wave: String,

        /// Capture mode
        #[arg(long, value_enum, default_value_t = ModeArg::Online)]
        mode: ModeArg,

        /// Connector size class
        #[arg(long, value_enum, default_value_t = SizeArg::M)]
        size: SizeArg,

        /// Environment segment of managed-layout paths
        #[arg(long, value_name = "NAME", default_value = "production")]
        environment: String,

        /// Layout convention; defaults to managed when sync is enabled
        #[arg(long, value_enum)]
        layout: Option<LayoutArg>,

        /// Output base directory when sync is disabled
        #[arg(long, value_name = "DIR", default_value = "out")]
        out: PathBuf,

        /// Cap on tables per capture group
        #[arg(long, value_name = "N")]
        max_tables: Option<i64>,

        /// Cap on accumulated rows per capture group
        #[arg(long, value_name = "N")]
        max_rows: Option<i64>,

        /// Branch name suffix; defaults to the wave identifier
        #[arg(long, value_name = "SUFFIX")]
        branch_suffix: Option<String>,

        /// Compute and log everything, write nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the configuration and environment without running a wave
    #[command(
        name = "check",
        long_about = "Validate the wave configuration and environment.\n\n\
            Parses the configuration file, runs full document validation, and \
            verifies that every listed alias has its credential variables set. \
            All problems are reported at once; the exit status is non-zero if \
            any were found. No database or repository is touched.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Validate before scheduling a wave
    wavegen check --config ingestion.yaml

    # Typical CI guard
    wavegen check --config ingestion.yaml && echo ready"
    )]
    Check {
        /// Ingestion configuration file
        #[arg(short, long, value_name = "FILE", default_value = "config.yaml")]
        config: PathBuf,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts.\n\n\
            Writes a completion script for the given shell to stdout. Source it \
            from your shell profile.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash
    wavegen completion bash > ~/.local/share/bash-completion/completions/wavegen

    # Zsh
    wavegen completion zsh > ~/.zfunc/_wavegen"
    )]
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Capture mode for the wave
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum ModeArg {
    /// Continuous change-data capture
    Online,
    /// One-shot snapshot load
    Batch,
}

impl From<ModeArg> for RunMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Online => RunMode::Online,
            ModeArg::Batch => RunMode::Batch,
        }
    }
}

/// Connector size class
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum SizeArg {
    /// Small
    P,
    /// Medium
    M,
    /// Large
    G,
}

impl From<SizeArg> for SizeClass {
    fn from(arg: SizeArg) -> Self {
        match arg {
            SizeArg::P => SizeClass::P,
            SizeArg::M => SizeClass::M,
            SizeArg::G => SizeClass::G,
        }
    }
}

/// Output tree convention
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum LayoutArg {
    /// Deployment-repository tree; roots must pre-exist
    Managed,
    /// Ad hoc output tree; directories created on demand
    Local,
}

impl From<LayoutArg> for LayoutMode {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Managed => LayoutMode::Managed,
            LayoutArg::Local => LayoutMode::Local,
        }
    }
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
