//! core
//!
//! Core domain types and planning logic for Wavegen.
//!
//! # Modules
//!
//! - [`types`] - Domain values: TableMetadata, SourceGroup, RunMode, SizeClass
//! - [`grouping`] - Bounded packing of tables into connector groups
//! - [`layout`] - Deterministic output paths for the artifact classes
//! - [`naming`] - Connector, topic, job, and file names
//! - [`config`] - Wave configuration schema, loading, and environment
//!
//! # Design Principles
//!
//! - Planning is pure: grouping, layout, and naming never touch I/O
//! - Identical inputs always produce identical plans
//! - Validation reports every problem in one pass

pub mod config;
pub mod grouping;
pub mod layout;
pub mod naming;
pub mod types;
