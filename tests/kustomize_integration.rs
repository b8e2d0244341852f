//! Integration tests for kustomization merging.
//!
//! These tests run the merge against real directories created via
//! tempfile and assert on the bytes that land on disk.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use wavegen::kustomize::{merge, KustomizeError, FILE_NAME};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn read_doc(dir: &Path) -> String {
    fs::read_to_string(dir.join(FILE_NAME)).expect("kustomization should exist")
}

// =============================================================================
// Fresh Documents
// =============================================================================

#[test]
fn creates_a_fresh_document_with_defaults_and_namespace() {
    let temp = TempDir::new().unwrap();

    merge(temp.path(), &names(&["a.yaml", "b.yaml"]), "ingestion").unwrap();

    let text = read_doc(temp.path());
    assert!(text.contains("apiVersion: kustomize.config.k8s.io/v1beta1"));
    assert!(text.contains("kind: Kustomization"));
    assert!(text.contains("namespace: ingestion"));
    let a = text.find("- a.yaml").expect("a.yaml listed");
    let b = text.find("- b.yaml").expect("b.yaml listed");
    assert!(a < b, "resources keep their given order");
}

#[test]
fn empty_namespace_hint_is_not_written() {
    let temp = TempDir::new().unwrap();

    merge(temp.path(), &names(&["a.yaml"]), "").unwrap();

    assert!(!read_doc(temp.path()).contains("namespace"));
}

#[test]
fn empty_name_list_touches_nothing() {
    let temp = TempDir::new().unwrap();

    merge(temp.path(), &[], "ingestion").unwrap();
    merge(temp.path(), &names(&["  ", ""]), "ingestion").unwrap();

    assert!(!temp.path().join(FILE_NAME).exists());
}

// =============================================================================
// Merging Into Existing Documents
// =============================================================================

#[test]
fn appends_only_new_names_and_keeps_existing_order() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(FILE_NAME),
        "apiVersion: kustomize.config.k8s.io/v1beta1\nkind: Kustomization\nresources:\n- old.yaml\n- shared.yaml\n",
    )
    .unwrap();

    merge(temp.path(), &names(&["shared.yaml", "new.yaml"]), "ingestion").unwrap();

    let text = read_doc(temp.path());
    let old = text.find("- old.yaml").unwrap();
    let shared = text.find("- shared.yaml").unwrap();
    let new = text.find("- new.yaml").unwrap();
    assert!(old < shared && shared < new);
    assert_eq!(text.matches("shared.yaml").count(), 1, "no duplicate entry");
}

#[test]
fn existing_namespace_is_never_overwritten() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(FILE_NAME),
        "namespace: platform\nresources:\n- old.yaml\n",
    )
    .unwrap();

    merge(temp.path(), &names(&["new.yaml"]), "ingestion").unwrap();

    let text = read_doc(temp.path());
    assert!(text.contains("namespace: platform"));
    assert!(!text.contains("namespace: ingestion"));
}

#[test]
fn fills_missing_api_version_and_kind_on_merge() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(FILE_NAME), "resources:\n- old.yaml\n").unwrap();

    merge(temp.path(), &names(&["new.yaml"]), "").unwrap();

    let text = read_doc(temp.path());
    assert!(text.contains("apiVersion: kustomize.config.k8s.io/v1beta1"));
    assert!(text.contains("kind: Kustomization"));
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn rerunning_the_same_merge_is_byte_identical() {
    let temp = TempDir::new().unwrap();
    let files = names(&["a.yaml", "b.yaml", "c.yaml"]);

    merge(temp.path(), &files, "ingestion").unwrap();
    let first = read_doc(temp.path());

    merge(temp.path(), &files, "ingestion").unwrap();
    let second = read_doc(temp.path());

    assert_eq!(first, second);
}

#[test]
fn successive_waves_accumulate() {
    let temp = TempDir::new().unwrap();

    merge(temp.path(), &names(&["wave1-a.yaml"]), "ingestion").unwrap();
    merge(temp.path(), &names(&["wave2-a.yaml", "wave1-a.yaml"]), "ingestion").unwrap();

    let text = read_doc(temp.path());
    assert_eq!(text.matches("wave1-a.yaml").count(), 1);
    assert_eq!(text.matches("wave2-a.yaml").count(), 1);
    let w1 = text.find("wave1-a.yaml").unwrap();
    let w2 = text.find("wave2-a.yaml").unwrap();
    assert!(w1 < w2, "earlier waves keep their position");
}

// =============================================================================
// Failure Modes
// =============================================================================

#[test]
fn malformed_existing_document_aborts() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(FILE_NAME), "resources: {not: [a, list}\n").unwrap();

    let err = merge(temp.path(), &names(&["new.yaml"]), "ingestion").unwrap_err();
    assert!(matches!(err, KustomizeError::Parse { .. }));

    // The broken document is left exactly as it was.
    assert_eq!(read_doc(temp.path()), "resources: {not: [a, list}\n");
}

#[test]
fn missing_directory_fails_on_write() {
    let temp = TempDir::new().unwrap();
    let gone = temp.path().join("never-created");

    let err = merge(&gone, &names(&["a.yaml"]), "ingestion").unwrap_err();
    assert!(matches!(err, KustomizeError::Write { .. }));
}
