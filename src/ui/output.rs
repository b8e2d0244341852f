//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! A wave touches many tables across many aliases, so progress lines are
//! emitted through a [`Printer`] that carries the run's verbosity instead
//! of threading a flag through every call site. Warnings always reach the
//! user unless quiet mode is on; debug lines only appear with `--debug`.

use std::fmt::Display;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Emits user-facing output at a fixed verbosity.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    verbosity: Verbosity,
}

impl Printer {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Print a progress message (respects quiet mode).
    pub fn info(&self, message: impl Display) {
        if self.verbosity != Verbosity::Quiet {
            println!("{}", message);
        }
    }

    /// Print a debug message (only in debug mode).
    pub fn debug(&self, message: impl Display) {
        if self.verbosity == Verbosity::Debug {
            eprintln!("[debug] {}", message);
        }
    }

    /// Print an error message (always shown).
    pub fn error(&self, message: impl Display) {
        eprintln!("error: {}", message);
    }

    /// Print a warning message (respects quiet mode).
    pub fn warn(&self, message: impl Display) {
        if self.verbosity != Verbosity::Quiet {
            eprintln!("warning: {}", message);
        }
    }

    /// Print a success message (respects quiet mode).
    pub fn success(&self, message: impl Display) {
        if self.verbosity != Verbosity::Quiet {
            println!("{}", message);
        }
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(Verbosity::Normal)
    }
}
