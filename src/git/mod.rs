//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the only doorway to Git. The synchronizer drives the
//! [`Vcs`] trait and never touches `git2` or the `git` binary itself, so
//! tests can swap in [`mock::RecordingVcs`] and assert on the exact
//! operation sequence.
//!
//! [`SystemGit`] is the shipped implementation. Repository-local state
//! (identity, branch reset, status, commit) goes through `git2`; network
//! operations (clone, fetch, pull, push) shell out to the `git` binary so
//! the operator's existing credential helpers and SSH configuration
//! apply unchanged.

mod interface;
mod system;

pub mod mock;

pub use interface::{GitError, Vcs};
pub use system::SystemGit;
