//! git::mock
//!
//! Recording [`Vcs`] implementation for deterministic testing.
//!
//! Records every operation in call order and answers the dirty check
//! from a configurable flag, so tests can drive the synchronizer through
//! both the commit-and-push and the no-changes paths without a real
//! repository.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use wavegen::git::mock::RecordingVcs;
//! use wavegen::git::Vcs;
//!
//! let vcs = RecordingVcs::new();
//! vcs.fetch_all(Path::new("/repo")).unwrap();
//! vcs.checkout(Path::new("/repo"), "main").unwrap();
//! assert_eq!(vcs.calls(), vec!["fetch-all", "checkout main"]);
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex};

use super::interface::{GitError, Vcs};

/// Internal mutable state.
#[derive(Debug, Default)]
struct RecordingInner {
    /// Operations in call order.
    calls: Vec<String>,
    /// Answer for `is_dirty`.
    dirty: bool,
    /// Operation name that should fail when invoked.
    fail_on: Option<String>,
}

/// Recording mock for the [`Vcs`] trait.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping, so a clone can
/// be kept for assertions after the original moves into the
/// synchronizer.
#[derive(Debug, Clone, Default)]
pub struct RecordingVcs {
    inner: Arc<Mutex<RecordingInner>>,
}

impl RecordingVcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the answer the next `is_dirty` calls return.
    pub fn set_dirty(&self, dirty: bool) {
        self.lock().dirty = dirty;
    }

    /// Make the named operation fail when invoked.
    pub fn fail_on(&self, op: &str) {
        self.lock().fail_on = Some(op.to_string());
    }

    /// Operations recorded so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RecordingInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: String) -> Result<(), GitError> {
        let mut inner = self.lock();
        let op = call.split_whitespace().next().unwrap_or_default().to_string();
        inner.calls.push(call.clone());
        if inner.fail_on.as_deref() == Some(op.as_str()) {
            return Err(GitError::CommandFailed {
                command: call,
                detail: "forced failure".to_string(),
            });
        }
        Ok(())
    }
}

impl Vcs for RecordingVcs {
    fn clone_branch(&self, url: &str, branch: &str, _dest: &Path) -> Result<(), GitError> {
        self.record(format!("clone {url} {branch}"))
    }

    fn fetch_all(&self, _repo: &Path) -> Result<(), GitError> {
        self.record("fetch-all".to_string())
    }

    fn checkout(&self, _repo: &Path, branch: &str) -> Result<(), GitError> {
        self.record(format!("checkout {branch}"))
    }

    fn pull_ff_only(&self, _repo: &Path) -> Result<(), GitError> {
        self.record("pull-ff-only".to_string())
    }

    fn configure_identity(&self, _repo: &Path, name: &str, email: &str) -> Result<(), GitError> {
        self.record(format!("configure-identity {name} <{email}>"))
    }

    fn create_or_reset_branch(
        &self,
        _repo: &Path,
        branch: &str,
        base: &str,
    ) -> Result<(), GitError> {
        self.record(format!("branch {branch} from {base}"))
    }

    fn is_dirty(&self, _repo: &Path) -> Result<bool, GitError> {
        self.record("status".to_string())?;
        Ok(self.lock().dirty)
    }

    fn commit_all(&self, _repo: &Path, message: &str) -> Result<(), GitError> {
        self.record(format!("commit {message}"))
    }

    fn push_tracking(&self, _repo: &Path, branch: &str) -> Result<(), GitError> {
        self.record(format!("push {branch}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_operations_in_order() {
        let vcs = RecordingVcs::new();
        let repo = Path::new("/repo");

        vcs.clone_branch("git@example.com:a/b.git", "main", repo)
            .unwrap();
        vcs.create_or_reset_branch(repo, "work", "main").unwrap();
        vcs.commit_all(repo, "message").unwrap();

        assert_eq!(
            vcs.calls(),
            vec![
                "clone git@example.com:a/b.git main",
                "branch work from main",
                "commit message",
            ]
        );
    }

    #[test]
    fn dirty_flag_drives_status_answer() {
        let vcs = RecordingVcs::new();
        assert!(!vcs.is_dirty(Path::new("/repo")).unwrap());
        vcs.set_dirty(true);
        assert!(vcs.is_dirty(Path::new("/repo")).unwrap());
    }

    #[test]
    fn forced_failure_hits_only_the_named_operation() {
        let vcs = RecordingVcs::new();
        let repo = Path::new("/repo");
        vcs.fail_on("push");

        vcs.commit_all(repo, "message").unwrap();
        let err = vcs.push_tracking(repo, "work").unwrap_err();
        assert!(matches!(err, GitError::CommandFailed { .. }));
    }
}
