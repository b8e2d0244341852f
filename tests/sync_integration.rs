//! Integration tests for repository synchronization.
//!
//! These tests run the synchronizer over [`SystemGit`] against real
//! repositories: a bare "remote" plus a seed clone that populates it,
//! all under tempfile. They cover the full session: clone or update,
//! branch force-reset, commit and push, and the clean no-op.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use wavegen::git::SystemGit;
use wavegen::sync::{PreparedRepo, SyncConfig, SyncError, SyncOutcome, Synchronizer};

/// Test fixture with a bare remote seeded with one commit on main.
struct SyncFixture {
    temp: TempDir,
    remote: PathBuf,
}

impl SyncFixture {
    fn new() -> Self {
        let temp = TempDir::new().expect("failed to create temp dir");

        let remote = temp.path().join("deploy.git");
        fs::create_dir_all(&remote).unwrap();
        run_git(&remote, &["init", "--bare"]);
        run_git(&remote, &["symbolic-ref", "HEAD", "refs/heads/main"]);

        let seed = temp.path().join("seed");
        fs::create_dir_all(&seed).unwrap();
        run_git(&seed, &["init"]);
        run_git(&seed, &["checkout", "-b", "main"]);
        run_git(&seed, &["config", "user.email", "seed@example.com"]);
        run_git(&seed, &["config", "user.name", "Seed"]);
        fs::write(seed.join("README.md"), "# Deploy\n").unwrap();
        run_git(&seed, &["add", "README.md"]);
        run_git(&seed, &["commit", "-m", "Initial commit"]);
        run_git(&seed, &["remote", "add", "origin", remote.to_str().unwrap()]);
        run_git(&seed, &["push", "origin", "main"]);

        Self { temp, remote }
    }

    /// Directory the synchronizer resolves its working copy against.
    fn exec_dir(&self) -> &Path {
        self.temp.path()
    }

    fn config(&self) -> SyncConfig {
        SyncConfig {
            repo_url: self.remote.to_str().unwrap().to_string(),
            base_branch: "main".to_string(),
            branch_prefix: "ingestion-".to_string(),
            local_path: None,
            user_name: "Wave Bot".to_string(),
            user_email: "bot@example.com".to_string(),
        }
    }

    fn synchronizer(&self) -> Synchronizer {
        Synchronizer::new(self.config(), Box::new(SystemGit::new()))
    }

    /// Push one more commit to main through the seed clone.
    fn push_seed_commit(&self, file: &str) {
        let seed = self.temp.path().join("seed");
        fs::write(seed.join(file), "update\n").unwrap();
        run_git(&seed, &["add", file]);
        run_git(&seed, &["commit", "-m", "Seed update"]);
        run_git(&seed, &["push", "origin", "main"]);
    }

    fn remote_has_branch(&self, branch: &str) -> bool {
        Command::new("git")
            .args(["rev-parse", "--verify", &format!("refs/heads/{branch}")])
            .current_dir(&self.remote)
            .output()
            .expect("git rev-parse failed")
            .status
            .success()
    }

    fn remote_tip(&self, branch: &str, format: &str) -> String {
        git_stdout(&self.remote, &["log", "-1", &format!("--format={format}"), branch])
    }
}

/// Run a git command in the given directory, panicking on failure.
fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// Run a git command and return its trimmed stdout.
fn git_stdout(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

fn current_branch(dir: &Path) -> String {
    git_stdout(dir, &["rev-parse", "--abbrev-ref", "HEAD"])
}

// =============================================================================
// Prepare: Clone and Update
// =============================================================================

#[test]
fn fresh_clone_lands_on_the_wave_branch() {
    let fx = SyncFixture::new();
    let sync = fx.synchronizer();

    let prepared = sync.prepare(fx.exec_dir(), Some("w1")).unwrap();

    assert_eq!(prepared.work_dir, fx.exec_dir().join("argocd-repo"));
    assert_eq!(prepared.branch, "ingestion-w1");
    assert!(prepared.work_dir.join(".git").is_dir());
    assert!(prepared.work_dir.join("README.md").is_file());
    assert_eq!(current_branch(&prepared.work_dir), "ingestion-w1");
}

#[test]
fn existing_clone_fast_forwards_from_the_remote() {
    let fx = SyncFixture::new();
    let sync = fx.synchronizer();

    sync.prepare(fx.exec_dir(), Some("w1")).unwrap();
    fx.push_seed_commit("feature.txt");

    let prepared = sync.prepare(fx.exec_dir(), Some("w2")).unwrap();

    assert_eq!(prepared.branch, "ingestion-w2");
    assert!(
        prepared.work_dir.join("feature.txt").is_file(),
        "wave branch should start from the updated base tip"
    );
}

#[test]
fn refuses_to_clone_into_a_non_empty_directory() {
    let fx = SyncFixture::new();
    let work = fx.exec_dir().join("argocd-repo");
    fs::create_dir_all(&work).unwrap();
    fs::write(work.join("stray.txt"), "not a clone").unwrap();

    let err = fx.synchronizer().prepare(fx.exec_dir(), Some("w1")).unwrap_err();

    assert!(matches!(err, SyncError::DestinationNotEmpty { .. }));
    assert!(work.join("stray.txt").is_file(), "directory left untouched");
}

#[test]
fn local_path_override_is_resolved_against_the_exec_dir() {
    let fx = SyncFixture::new();
    let mut cfg = fx.config();
    cfg.local_path = Some(PathBuf::from("checkout/deploy"));
    let sync = Synchronizer::new(cfg, Box::new(SystemGit::new()));

    let prepared = sync.prepare(fx.exec_dir(), Some("w1")).unwrap();

    assert_eq!(prepared.work_dir, fx.exec_dir().join("checkout/deploy"));
    assert!(prepared.work_dir.join(".git").is_dir());
}

// =============================================================================
// Finalize: Commit and Push
// =============================================================================

#[test]
fn commit_and_push_publishes_the_branch() {
    let fx = SyncFixture::new();
    let sync = fx.synchronizer();
    let prepared = sync.prepare(fx.exec_dir(), Some("w9")).unwrap();

    let apps = prepared.work_dir.join("apps/source");
    fs::create_dir_all(&apps).unwrap();
    fs::write(apps.join("demo.yaml"), "kind: Demo\n").unwrap();

    let outcome = sync.finalize(&prepared, "Ingestion wave 9").unwrap();

    assert_eq!(
        outcome,
        SyncOutcome::Pushed {
            branch: "ingestion-w9".to_string()
        }
    );
    assert!(fx.remote_has_branch("ingestion-w9"));
    assert_eq!(fx.remote_tip("ingestion-w9", "%s"), "Ingestion wave 9");
    assert_eq!(fx.remote_tip("ingestion-w9", "%an"), "Wave Bot");
}

#[test]
fn clean_worktree_publishes_nothing() {
    let fx = SyncFixture::new();
    let sync = fx.synchronizer();
    let prepared = sync.prepare(fx.exec_dir(), Some("w5")).unwrap();

    let outcome = sync.finalize(&prepared, "Ingestion wave 5").unwrap();

    assert_eq!(outcome, SyncOutcome::NoChanges);
    assert!(!fx.remote_has_branch("ingestion-w5"));
}

#[test]
fn rerunning_a_wave_resets_its_branch_from_base() {
    let fx = SyncFixture::new();
    let sync = fx.synchronizer();

    let prepared = sync.prepare(fx.exec_dir(), Some("w3")).unwrap();
    let apps = prepared.work_dir.join("apps");
    fs::create_dir_all(&apps).unwrap();
    fs::write(apps.join("demo.yaml"), "kind: Demo\n").unwrap();
    sync.finalize(&prepared, "Ingestion wave 3").unwrap();

    // Second run of the same wave: the branch is recreated from the base
    // tip, so the previous run's commit is no longer in the worktree.
    let again = sync.prepare(fx.exec_dir(), Some("w3")).unwrap();
    assert_eq!(again.branch, "ingestion-w3");
    assert!(!again.work_dir.join("apps/demo.yaml").exists());

    let outcome = sync.finalize(&again, "Ingestion wave 3").unwrap();
    assert_eq!(outcome, SyncOutcome::NoChanges);
}

#[test]
fn untracked_files_in_new_directories_are_committed() {
    let fx = SyncFixture::new();
    let sync = fx.synchronizer();
    let prepared = sync.prepare(fx.exec_dir(), Some("w4")).unwrap();

    // A whole new directory tree, nothing previously tracked.
    let nested = prepared.work_dir.join("apps/sink/jobsnowflake/lz");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("one.yaml"), "a: 1\n").unwrap();
    fs::write(nested.join("two.yaml"), "b: 2\n").unwrap();

    let outcome = sync.finalize(&prepared, "Ingestion wave 4").unwrap();

    assert!(matches!(outcome, SyncOutcome::Pushed { .. }));
    let listed = git_stdout(
        &fx.remote,
        &["ls-tree", "-r", "--name-only", "ingestion-w4"],
    );
    assert!(listed.contains("apps/sink/jobsnowflake/lz/one.yaml"));
    assert!(listed.contains("apps/sink/jobsnowflake/lz/two.yaml"));
}

// =============================================================================
// Session Shape
// =============================================================================

#[test]
fn prepared_repo_reports_the_session_paths() {
    let fx = SyncFixture::new();
    let prepared: PreparedRepo = fx.synchronizer().prepare(fx.exec_dir(), Some("w8")).unwrap();

    assert!(prepared.work_dir.is_absolute());
    assert!(prepared.branch.starts_with("ingestion-"));
}
