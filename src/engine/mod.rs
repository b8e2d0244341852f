//! engine
//!
//! Orchestrates a wave: Config -> Metadata -> Grouping -> Emission -> Sync.
//!
//! # Lifecycle
//!
//! Every wave follows the same sequence:
//!
//! ```text
//! load config -> resolve env -> collect metadata -> pack groups
//!     -> emit manifests -> merge kustomizations -> [commit + push]
//! ```
//!
//! The sync stage only runs when a repository URL is configured; dry-run
//! walks the whole sequence but stops short of every mutation.

pub mod wave;

pub use wave::{run_wave, WaveContext, WaveError, WaveOptions, WaveReport};
