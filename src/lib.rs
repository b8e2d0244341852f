//! Wavegen - planning and publication of streaming-ingestion connector waves
//!
//! Wavegen takes a declarative list of SQL Server tables, packs them into
//! bounded change-data-capture groups, renders the Kafka Connect and
//! Snowflake manifests for each group, and lands the result either in a
//! local output tree or on a fresh branch of a GitOps deployment repository.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Orchestrates one wave: metadata -> grouping -> emission -> sync
//! - [`core`] - Domain types, grouping, layout, naming, and configuration
//! - [`source`] - Table metadata supplier (SQL Server introspection)
//! - [`render`] - Manifest templates and rendering
//! - [`kustomize`] - Per-directory resource-list accumulation
//! - [`git`] - Version-control port and its system implementation
//! - [`sync`] - Working-copy lifecycle: clone/update, branch, commit, push
//! - [`ui`] - User-facing output utilities
//!
//! # Correctness Invariants
//!
//! Wavegen maintains the following invariants:
//!
//! 1. Grouping is a deterministic partition of the configured tables
//! 2. Every emitted file lands at a path derived by pure layout functions
//! 3. Resource-list merges are idempotent across repeated waves
//! 4. A clean working copy after the write phase commits and pushes nothing

pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod kustomize;
pub mod render;
pub mod source;
pub mod sync;
pub mod ui;
