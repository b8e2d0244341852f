//! git::system
//!
//! The shipped [`Vcs`] implementation.
//!
//! Network operations (clone, fetch, pull, push) run the `git` binary so
//! credential helpers and SSH agents configured on the host keep
//! working. Repository-local operations use `git2` for structured
//! results instead of parsing porcelain output.

use std::path::Path;
use std::process::Command;

use super::interface::{GitError, Vcs};

/// `Vcs` backed by the system git binary plus libgit2.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGit;

impl SystemGit {
    pub fn new() -> Self {
        SystemGit
    }

    fn open(&self, path: &Path) -> Result<git2::Repository, GitError> {
        git2::Repository::open(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })
    }
}

/// Run `git <args>` in `dir`, capturing output.
fn run_git(dir: Option<&Path>, args: &[&str]) -> Result<(), GitError> {
    let command = format!("git {}", args.join(" "));

    let mut cmd = Command::new("git");
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }
    let output = cmd.args(args).output().map_err(|source| GitError::Spawn {
        command: command.clone(),
        source,
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = if stderr.trim().is_empty() {
            format!("exit status {}", output.status)
        } else {
            stderr.trim().to_string()
        };
        return Err(GitError::CommandFailed { command, detail });
    }
    Ok(())
}

impl Vcs for SystemGit {
    fn clone_branch(&self, url: &str, branch: &str, dest: &Path) -> Result<(), GitError> {
        let dest = dest.to_string_lossy();
        run_git(None, &["clone", "--branch", branch, url, dest.as_ref()])
    }

    fn fetch_all(&self, repo: &Path) -> Result<(), GitError> {
        run_git(Some(repo), &["fetch", "--all"])
    }

    fn checkout(&self, repo: &Path, branch: &str) -> Result<(), GitError> {
        run_git(Some(repo), &["checkout", branch])
    }

    fn pull_ff_only(&self, repo: &Path) -> Result<(), GitError> {
        run_git(Some(repo), &["pull", "--ff-only"])
    }

    fn configure_identity(&self, repo: &Path, name: &str, email: &str) -> Result<(), GitError> {
        let repo = self.open(repo)?;
        let mut config = repo.config()?;
        if !name.trim().is_empty() {
            config.set_str("user.name", name)?;
        }
        if !email.trim().is_empty() {
            config.set_str("user.email", email)?;
        }
        Ok(())
    }

    fn create_or_reset_branch(
        &self,
        repo: &Path,
        branch: &str,
        base: &str,
    ) -> Result<(), GitError> {
        let repo = self.open(repo)?;
        let target = repo
            .find_branch(base, git2::BranchType::Local)?
            .get()
            .peel_to_commit()?;
        repo.branch(branch, &target, true)?;
        repo.set_head(&format!("refs/heads/{branch}"))?;

        let mut checkout = git2::build::CheckoutBuilder::new();
        checkout.force();
        repo.checkout_head(Some(&mut checkout))?;
        Ok(())
    }

    fn is_dirty(&self, repo: &Path) -> Result<bool, GitError> {
        let repo = self.open(repo)?;
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = repo.statuses(Some(&mut opts))?;
        Ok(!statuses.is_empty())
    }

    fn commit_all(&self, repo: &Path, message: &str) -> Result<(), GitError> {
        let repo = self.open(repo)?;

        let mut index = repo.index()?;
        index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        let signature = repo.signature()?;
        let parent = repo.head()?.peel_to_commit()?;
        repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;
        Ok(())
    }

    fn push_tracking(&self, repo: &Path, branch: &str) -> Result<(), GitError> {
        run_git(Some(repo), &["push", "-u", "origin", branch])
    }
}
