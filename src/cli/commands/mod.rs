//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls the engine or configuration layer to do the work
//! 3. Formats and displays output
//!
//! Handlers do NOT write manifests or touch repositories directly.

mod check;
mod completion;
mod run;

// Re-export command functions for testing and direct invocation
pub use check::check;
pub use completion::completion;
pub use run::run;

use anyhow::Result;

use crate::cli::args::Command;
use crate::engine::WaveOptions;
use crate::ui::Printer;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, printer: &Printer) -> Result<()> {
    match command {
        Command::Run {
            config,
            wave,
            mode,
            size,
            environment,
            layout,
            out,
            max_tables,
            max_rows,
            branch_suffix,
            dry_run,
        } => run(
            printer,
            WaveOptions {
                config_path: config,
                wave,
                mode: mode.into(),
                size: size.into(),
                environment,
                layout: layout.map(Into::into),
                out_dir: out,
                max_tables,
                max_rows,
                branch_suffix,
                dry_run,
            },
        ),
        Command::Check { config } => check(printer, &config),
        Command::Completion { shell } => completion(shell),
    }
}
