//! cli
//!
//! Command-line interface layer for Wavegen.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Does NOT collect metadata or write manifests directly
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! the [`crate::engine`] for execution. All output tree and repository
//! changes flow through the engine's wave lifecycle.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::Result;

use crate::ui::{Printer, Verbosity};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    // A local .env supplies repository and credential variables during
    // development; absence is not an error.
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let printer = Printer::new(Verbosity::from_flags(cli.quiet, cli.debug));

    commands::dispatch(cli.command, &printer)
}
