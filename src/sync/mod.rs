//! sync
//!
//! Repository synchronization: prepare a working branch for one wave,
//! then commit and push whatever the run wrote.
//!
//! # Design
//!
//! A session has two halves around the manifest writes. [`Synchronizer::prepare`]
//! brings the local clone up to date on the base branch and force-creates
//! the wave branch; [`Synchronizer::finalize`] commits and pushes, or
//! reports [`SyncOutcome::NoChanges`] when a re-run produced identical
//! output. Everything goes through the [`Vcs`] port, so the whole state
//! machine is testable against a recording mock.
//!
//! Synchronization is opt-in: without `GIT_REPO_URL` in the environment
//! there is no [`SyncConfig`] and the engine writes to a plain directory
//! instead.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;

use crate::git::{GitError, Vcs};

/// Directory created next to the invocation when `GIT_LOCAL_PATH` is unset.
pub const DEFAULT_LOCAL_DIR: &str = "argocd-repo";

const DEFAULT_BASE_BRANCH: &str = "main";
const DEFAULT_BRANCH_PREFIX: &str = "ingestion-";

/// Errors from repository synchronization.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Clone destination exists and already has content.
    #[error("directory {path} already exists and is not empty, refusing to clone into it")]
    DestinationNotEmpty { path: PathBuf },

    /// Filesystem inspection around the clone decision failed.
    #[error("failed to inspect {path}: {source}")]
    Inspect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Git(#[from] GitError),
}

/// Git settings resolved from the environment.
///
/// `GIT_REPO_URL` is the master switch: absent or blank means
/// synchronization is disabled and no config exists.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub repo_url: String,
    pub base_branch: String,
    pub branch_prefix: String,
    /// Raw `GIT_LOCAL_PATH` value; resolved by [`SyncConfig::work_dir`].
    pub local_path: Option<PathBuf>,
    /// Commit identity, blank when not provided.
    pub user_name: String,
    pub user_email: String,
}

impl SyncConfig {
    /// Resolve from a lookup function over environment variables.
    ///
    /// Returns `None` when `GIT_REPO_URL` is absent or blank.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let repo_url = non_blank(lookup("GIT_REPO_URL"))?;
        Some(Self {
            repo_url,
            base_branch: non_blank(lookup("GIT_BASE_BRANCH"))
                .unwrap_or_else(|| DEFAULT_BASE_BRANCH.to_string()),
            branch_prefix: non_blank(lookup("GIT_TARGET_BRANCH_PREFIX"))
                .unwrap_or_else(|| DEFAULT_BRANCH_PREFIX.to_string()),
            local_path: non_blank(lookup("GIT_LOCAL_PATH")).map(PathBuf::from),
            user_name: lookup("GIT_USER_NAME").unwrap_or_default(),
            user_email: lookup("GIT_USER_EMAIL").unwrap_or_default(),
        })
    }

    /// Resolve from the process environment.
    pub fn from_env() -> Option<Self> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Absolute path of the local working copy.
    ///
    /// Relative `GIT_LOCAL_PATH` values resolve against `exec_dir`; an
    /// unset path lands in [`DEFAULT_LOCAL_DIR`] under `exec_dir`.
    pub fn work_dir(&self, exec_dir: &Path) -> PathBuf {
        match &self.local_path {
            None => exec_dir.join(DEFAULT_LOCAL_DIR),
            Some(path) if path.is_relative() => exec_dir.join(path),
            Some(path) => path.clone(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A working copy checked out on the wave branch, ready for writes.
#[derive(Debug, Clone)]
pub struct PreparedRepo {
    pub work_dir: PathBuf,
    pub branch: String,
}

/// What `finalize` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A commit was created and pushed on `branch`.
    Pushed { branch: String },
    /// The worktree was clean; nothing to commit.
    NoChanges,
}

/// Drives the prepare / write / finalize session over a [`Vcs`].
pub struct Synchronizer {
    cfg: SyncConfig,
    vcs: Box<dyn Vcs>,
}

impl Synchronizer {
    pub fn new(cfg: SyncConfig, vcs: Box<dyn Vcs>) -> Self {
        Self { cfg, vcs }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.cfg
    }

    /// Bring the working copy up to date and check out the wave branch.
    ///
    /// A missing clone is created from the base branch; an existing one
    /// is fetched and fast-forwarded. The wave branch is then
    /// force-created from the base branch tip, so a re-run of the same
    /// wave replaces its previous branch. Identity configuration is
    /// best-effort: a failure there never aborts the run.
    pub fn prepare(
        &self,
        exec_dir: &Path,
        branch_suffix: Option<&str>,
    ) -> Result<PreparedRepo, SyncError> {
        let work_dir = self.cfg.work_dir(exec_dir);

        let git_dir = work_dir.join(".git");
        match fs::metadata(&git_dir) {
            Ok(_) => {
                self.vcs.fetch_all(&work_dir)?;
                self.vcs.checkout(&work_dir, &self.cfg.base_branch)?;
                self.vcs.pull_ff_only(&work_dir)?;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.clone_fresh(&work_dir)?;
            }
            Err(source) => {
                return Err(SyncError::Inspect {
                    path: git_dir,
                    source,
                });
            }
        }

        let _ = self
            .vcs
            .configure_identity(&work_dir, &self.cfg.user_name, &self.cfg.user_email);

        let branch = self.branch_name(branch_suffix);
        self.vcs.checkout(&work_dir, &self.cfg.base_branch)?;
        self.vcs
            .create_or_reset_branch(&work_dir, &branch, &self.cfg.base_branch)?;

        Ok(PreparedRepo { work_dir, branch })
    }

    /// Commit everything under the working copy and push the branch.
    ///
    /// A clean worktree is a successful no-op: re-running a wave whose
    /// manifests have not changed must not create empty commits.
    pub fn finalize(&self, prepared: &PreparedRepo, message: &str) -> Result<SyncOutcome, SyncError> {
        if !self.vcs.is_dirty(&prepared.work_dir)? {
            return Ok(SyncOutcome::NoChanges);
        }
        self.vcs.commit_all(&prepared.work_dir, message)?;
        self.vcs.push_tracking(&prepared.work_dir, &prepared.branch)?;
        Ok(SyncOutcome::Pushed {
            branch: prepared.branch.clone(),
        })
    }

    fn clone_fresh(&self, work_dir: &Path) -> Result<(), SyncError> {
        if let Some(parent) = work_dir.parent() {
            fs::create_dir_all(parent).map_err(|source| SyncError::Inspect {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        match fs::read_dir(work_dir) {
            Ok(mut entries) => {
                if entries.next().is_some() {
                    return Err(SyncError::DestinationNotEmpty {
                        path: work_dir.to_path_buf(),
                    });
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(SyncError::Inspect {
                    path: work_dir.to_path_buf(),
                    source,
                });
            }
        }

        self.vcs
            .clone_branch(&self.cfg.repo_url, &self.cfg.base_branch, work_dir)?;
        Ok(())
    }

    /// Branch name for this session: prefix plus the sanitized suffix,
    /// falling back to a timestamp when no suffix was given.
    fn branch_name(&self, suffix: Option<&str>) -> String {
        let suffix = suffix.map(str::trim).unwrap_or("");
        let suffix = if suffix.is_empty() {
            Local::now().format("%Y%m%d-%H%M%S").to_string()
        } else {
            suffix.replace(' ', "-")
        };
        format!("{}{}", self.cfg.branch_prefix, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::RecordingVcs;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn test_config() -> SyncConfig {
        SyncConfig {
            repo_url: "git@example.com:org/argocd.git".to_string(),
            base_branch: "main".to_string(),
            branch_prefix: "ingestion-".to_string(),
            local_path: None,
            user_name: "Wave Bot".to_string(),
            user_email: "bot@example.com".to_string(),
        }
    }

    mod config {
        use super::*;

        #[test]
        fn disabled_without_repo_url() {
            assert!(SyncConfig::resolve(lookup_from(&[])).is_none());
            assert!(SyncConfig::resolve(lookup_from(&[("GIT_REPO_URL", "   ")])).is_none());
        }

        #[test]
        fn defaults_fill_missing_settings() {
            let cfg =
                SyncConfig::resolve(lookup_from(&[("GIT_REPO_URL", "https://example.com/r.git")]))
                    .unwrap();
            assert_eq!(cfg.base_branch, "main");
            assert_eq!(cfg.branch_prefix, "ingestion-");
            assert!(cfg.local_path.is_none());
            assert_eq!(cfg.user_name, "");
        }

        #[test]
        fn explicit_settings_win() {
            let cfg = SyncConfig::resolve(lookup_from(&[
                ("GIT_REPO_URL", "https://example.com/r.git"),
                ("GIT_BASE_BRANCH", "trunk"),
                ("GIT_TARGET_BRANCH_PREFIX", "wave/"),
                ("GIT_LOCAL_PATH", "checkout"),
                ("GIT_USER_NAME", "Bot"),
                ("GIT_USER_EMAIL", "bot@example.com"),
            ]))
            .unwrap();
            assert_eq!(cfg.base_branch, "trunk");
            assert_eq!(cfg.branch_prefix, "wave/");
            assert_eq!(cfg.local_path.as_deref(), Some(Path::new("checkout")));
            assert_eq!(cfg.user_email, "bot@example.com");
        }

        #[test]
        fn work_dir_resolution() {
            let exec = Path::new("/work");

            let mut cfg = test_config();
            assert_eq!(cfg.work_dir(exec), Path::new("/work/argocd-repo"));

            cfg.local_path = Some(PathBuf::from("relative/repo"));
            assert_eq!(cfg.work_dir(exec), Path::new("/work/relative/repo"));

            cfg.local_path = Some(PathBuf::from("/abs/repo"));
            assert_eq!(cfg.work_dir(exec), Path::new("/abs/repo"));
        }
    }

    mod prepare {
        use super::*;

        #[test]
        fn update_path_fetches_then_branches() {
            let exec = tempfile::TempDir::new().unwrap();
            let work = exec.path().join(DEFAULT_LOCAL_DIR);
            fs::create_dir_all(work.join(".git")).unwrap();

            let vcs = RecordingVcs::new();
            let sync = Synchronizer::new(test_config(), Box::new(vcs.clone()));

            let prepared = sync.prepare(exec.path(), Some("wave 7")).unwrap();
            assert_eq!(prepared.branch, "ingestion-wave-7");
            assert_eq!(prepared.work_dir, work);
            assert_eq!(
                vcs.calls(),
                vec![
                    "fetch-all",
                    "checkout main",
                    "pull-ff-only",
                    "configure-identity Wave Bot <bot@example.com>",
                    "checkout main",
                    "branch ingestion-wave-7 from main",
                ]
            );
        }

        #[test]
        fn missing_clone_is_created_from_base_branch() {
            let exec = tempfile::TempDir::new().unwrap();
            let vcs = RecordingVcs::new();
            let sync = Synchronizer::new(test_config(), Box::new(vcs.clone()));

            sync.prepare(exec.path(), Some("w1")).unwrap();
            let calls = vcs.calls();
            assert_eq!(calls[0], "clone git@example.com:org/argocd.git main");
            assert!(!calls.contains(&"fetch-all".to_string()));
        }

        #[test]
        fn refuses_to_clone_into_non_empty_directory() {
            let exec = tempfile::TempDir::new().unwrap();
            let work = exec.path().join(DEFAULT_LOCAL_DIR);
            fs::create_dir_all(&work).unwrap();
            fs::write(work.join("existing.txt"), "content").unwrap();

            let vcs = RecordingVcs::new();
            let sync = Synchronizer::new(test_config(), Box::new(vcs.clone()));

            let err = sync.prepare(exec.path(), Some("w1")).unwrap_err();
            assert!(matches!(err, SyncError::DestinationNotEmpty { .. }));
            assert!(vcs.calls().is_empty());
        }

        #[test]
        fn identity_failure_does_not_abort() {
            let exec = tempfile::TempDir::new().unwrap();
            let work = exec.path().join(DEFAULT_LOCAL_DIR);
            fs::create_dir_all(work.join(".git")).unwrap();

            let vcs = RecordingVcs::new();
            vcs.fail_on("configure-identity");
            let sync = Synchronizer::new(test_config(), Box::new(vcs.clone()));

            sync.prepare(exec.path(), Some("w1")).unwrap();
        }

        #[test]
        fn empty_suffix_falls_back_to_timestamp() {
            let exec = tempfile::TempDir::new().unwrap();
            let work = exec.path().join(DEFAULT_LOCAL_DIR);
            fs::create_dir_all(work.join(".git")).unwrap();

            let vcs = RecordingVcs::new();
            let sync = Synchronizer::new(test_config(), Box::new(vcs));

            let prepared = sync.prepare(exec.path(), None).unwrap();
            let suffix = prepared.branch.strip_prefix("ingestion-").unwrap();
            assert_eq!(suffix.len(), "20240101-120000".len());
            assert!(suffix.chars().all(|c| c.is_ascii_digit() || c == '-'));

            let blank = sync.prepare(exec.path(), Some("   ")).unwrap();
            assert!(blank.branch.starts_with("ingestion-"));
        }
    }

    mod finalize {
        use super::*;

        fn prepared() -> PreparedRepo {
            PreparedRepo {
                work_dir: PathBuf::from("/work/argocd-repo"),
                branch: "ingestion-w1".to_string(),
            }
        }

        #[test]
        fn clean_worktree_is_a_no_op() {
            let vcs = RecordingVcs::new();
            let sync = Synchronizer::new(test_config(), Box::new(vcs.clone()));

            let outcome = sync.finalize(&prepared(), "Ingestion wave w1").unwrap();
            assert_eq!(outcome, SyncOutcome::NoChanges);
            assert_eq!(vcs.calls(), vec!["status"]);
        }

        #[test]
        fn dirty_worktree_commits_then_pushes() {
            let vcs = RecordingVcs::new();
            vcs.set_dirty(true);
            let sync = Synchronizer::new(test_config(), Box::new(vcs.clone()));

            let outcome = sync.finalize(&prepared(), "Ingestion wave w1").unwrap();
            assert_eq!(
                outcome,
                SyncOutcome::Pushed {
                    branch: "ingestion-w1".to_string()
                }
            );
            assert_eq!(
                vcs.calls(),
                vec!["status", "commit Ingestion wave w1", "push ingestion-w1"]
            );
        }

        #[test]
        fn push_failure_propagates() {
            let vcs = RecordingVcs::new();
            vcs.set_dirty(true);
            vcs.fail_on("push");
            let sync = Synchronizer::new(test_config(), Box::new(vcs));

            let err = sync.finalize(&prepared(), "message").unwrap_err();
            assert!(matches!(err, SyncError::Git(_)));
        }
    }
}
