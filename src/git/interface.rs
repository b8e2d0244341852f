//! git::interface
//!
//! The version-control port the synchronizer is written against.
//!
//! Operations take the repository path per call: the synchronizer may
//! clone a repository that does not exist yet, so the implementation
//! cannot hold an open handle across the whole session.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// No repository at the given path.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was opened
        path: PathBuf,
    },

    /// The git binary could not be started.
    #[error("failed to run {command}: {source}")]
    Spawn {
        /// The full command line
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A git command exited with failure.
    #[error("{command} failed: {detail}")]
    CommandFailed {
        /// The full command line
        command: String,
        /// Captured stderr, or the exit status when stderr was empty
        detail: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

/// Version-control operations the synchronizer needs.
///
/// The contract mirrors what an operator would type by hand: work
/// happens on a force-created branch off the base branch, everything
/// under the worktree is committed in one commit, and the branch is
/// pushed with an upstream so a follow-up push needs no arguments.
pub trait Vcs {
    /// Clone `url` at `branch` into `dest`.
    fn clone_branch(&self, url: &str, branch: &str, dest: &Path) -> Result<(), GitError>;

    /// Fetch every remote.
    fn fetch_all(&self, repo: &Path) -> Result<(), GitError>;

    /// Check out an existing branch.
    fn checkout(&self, repo: &Path, branch: &str) -> Result<(), GitError>;

    /// Fast-forward the current branch from its upstream.
    ///
    /// Fails when the branches have diverged; the synchronizer treats
    /// that as fatal rather than guessing at a merge.
    fn pull_ff_only(&self, repo: &Path) -> Result<(), GitError>;

    /// Write `user.name` / `user.email` into the repository config.
    ///
    /// Blank fields are left untouched.
    fn configure_identity(&self, repo: &Path, name: &str, email: &str) -> Result<(), GitError>;

    /// Create `branch` at the tip of `base` and check it out, replacing
    /// any previous branch of the same name.
    fn create_or_reset_branch(&self, repo: &Path, branch: &str, base: &str)
        -> Result<(), GitError>;

    /// Whether the worktree has any pending change, untracked files
    /// included.
    fn is_dirty(&self, repo: &Path) -> Result<bool, GitError>;

    /// Stage every change (additions, modifications, deletions) and
    /// commit with `message`.
    fn commit_all(&self, repo: &Path, message: &str) -> Result<(), GitError>;

    /// Push `branch` to origin, setting it as upstream.
    fn push_tracking(&self, repo: &Path, branch: &str) -> Result<(), GitError>;
}
